//! CSV export.
//!
//! One line per record, no header, `\n` separated. Values are joined with
//! commas as-is: embedded commas are not escaped, matching the format the
//! list screen has always shared.

use crate::model::intern::InternRecord;

/// Column order of each exported line.
pub const CSV_COLUMNS: [&str; 9] = [
    "lastName",
    "firstNames",
    "department",
    "email",
    "phone",
    "entryDate",
    "endDate",
    "socialSecurityNumber",
    "contractRenewal",
];

pub fn render_csv(records: &[InternRecord]) -> String {
    records
        .iter()
        .map(csv_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn csv_line(record: &InternRecord) -> String {
    let date = |value: Option<chrono::NaiveDate>| value.map(|d| d.to_string()).unwrap_or_default();
    [
        record.last_name.clone(),
        record.first_names.clone(),
        record.department.as_str().to_string(),
        record.email.clone().unwrap_or_default(),
        record.phone.clone().unwrap_or_default(),
        date(record.entry_date),
        date(record.end_date),
        record.social_security_number.clone().unwrap_or_default(),
        record
            .contract_renewal
            .map(|value| value.as_str().to_string())
            .unwrap_or_default(),
    ]
    .join(",")
}
