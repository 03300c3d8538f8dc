//! Tabular document export (HTML table).
//!
//! Rendered from whatever view the caller passes in, typically the current
//! filtered and sorted list. Cell text is HTML-escaped.

use crate::model::intern::InternRecord;

pub const TABLE_HEADERS: [&str; 6] = [
    "Last name",
    "First names",
    "Department",
    "Entry date",
    "Email",
    "Phone",
];

const DOCUMENT_TITLE: &str = "Interns";

pub fn render_table(records: &[InternRecord]) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{DOCUMENT_TITLE}</title>\n"));
    html.push_str(
        "<style>table{border-collapse:collapse;width:100%}\
         th,td{border:1px solid #999;padding:4px;text-align:left}</style>\n",
    );
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h1>{DOCUMENT_TITLE}</h1>\n<table>\n<tr>"));
    for header in TABLE_HEADERS {
        html.push_str(&format!("<th>{header}</th>"));
    }
    html.push_str("</tr>\n");

    for record in records {
        let cells = [
            record.last_name.clone(),
            record.first_names.clone(),
            record.department.as_str().to_string(),
            record
                .entry_date
                .map(|date| date.to_string())
                .unwrap_or_default(),
            record.email.clone().unwrap_or_default(),
            record.phone.clone().unwrap_or_default(),
        ];
        html.push_str("<tr>");
        for cell in &cells {
            html.push_str(&format!("<td>{}</td>", escape_html(cell)));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</table>\n</body>\n</html>\n");
    html
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_html;

    #[test]
    fn escape_html_replaces_markup_characters() {
        assert_eq!(
            escape_html("<b>O'Neil & \"Co\"</b>"),
            "&lt;b&gt;O&#39;Neil &amp; &quot;Co&quot;&lt;/b&gt;"
        );
    }
}
