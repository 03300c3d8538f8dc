//! Validation policy for intern writes.
//!
//! # Responsibility
//! - Check required fields, formats and cross-field rules before a write.
//! - Derive `end_date` from contract renewal settings.
//! - Parse boundary strings (dates) into typed values.
//!
//! # Invariants
//! - Rules run in a fixed order and the first failure wins.
//! - Functions here are pure; only `validate` reads the clock.

use crate::model::intern::{ContractRenewal, InternFields};
use chrono::{Months, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{10,14}$").expect("valid phone regex"));

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// First violated rule of a rejected write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyLastName,
    EmptyFirstNames,
    MissingBirthDate,
    BirthDateInFuture {
        birth_date: NaiveDate,
        today: NaiveDate,
    },
    MissingDepartment,
    InvalidEmail(String),
    InvalidPhone(String),
    MissingRenewalDuration,
    MissingEntryDateForRenewal,
    EndDateBeforeEntryDate {
        entry_date: NaiveDate,
        end_date: NaiveDate,
    },
    /// `entry_date + months` is not representable.
    EndDateOutOfRange {
        entry_date: NaiveDate,
        months: u32,
    },
    MalformedDate {
        field: &'static str,
        value: String,
    },
    UnknownDepartment(String),
    UnknownContractRenewal(String),
    UnknownRenewalDuration(String),
    UnknownAttachmentKind(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyLastName => write!(f, "last name is required"),
            Self::EmptyFirstNames => write!(f, "first names are required"),
            Self::MissingBirthDate => write!(f, "birth date is required"),
            Self::BirthDateInFuture { birth_date, today } => write!(
                f,
                "birth date {birth_date} must not be after today ({today})"
            ),
            Self::MissingDepartment => write!(f, "department is required"),
            Self::InvalidEmail(value) => write!(f, "invalid email address: `{value}`"),
            Self::InvalidPhone(value) => write!(
                f,
                "invalid phone number `{value}`: expected optional `+` and 10-14 digits"
            ),
            Self::MissingRenewalDuration => {
                write!(f, "renewal duration is required when the contract is renewed")
            }
            Self::MissingEntryDateForRenewal => {
                write!(f, "entry date is required when the contract is renewed")
            }
            Self::EndDateBeforeEntryDate {
                entry_date,
                end_date,
            } => write!(
                f,
                "end date ({end_date}) must be >= entry date ({entry_date})"
            ),
            Self::EndDateOutOfRange { entry_date, months } => write!(
                f,
                "end date out of range: {entry_date} + {months} month(s)"
            ),
            Self::MalformedDate { field, value } => write!(
                f,
                "malformed {field} `{value}`: expected YYYY-MM-DD or DD/MM/YYYY"
            ),
            Self::UnknownDepartment(value) => write!(f, "unknown department: `{value}`"),
            Self::UnknownContractRenewal(value) => {
                write!(f, "unknown contract renewal value: `{value}`")
            }
            Self::UnknownRenewalDuration(value) => {
                write!(f, "unknown renewal duration `{value}`: expected 1, 3 or 6")
            }
            Self::UnknownAttachmentKind(value) => write!(
                f,
                "unknown attachment kind `{value}`: expected idDocument, birthCert or resume"
            ),
        }
    }
}

impl Error for ValidationError {}

/// Validates `fields` against today's date.
pub fn validate(fields: &InternFields) -> Result<(), ValidationError> {
    validate_at(fields, Utc::now().date_naive())
}

/// Validates `fields`, treating `today` as the latest acceptable birth date.
pub fn validate_at(fields: &InternFields, today: NaiveDate) -> Result<(), ValidationError> {
    if fields.last_name.trim().is_empty() {
        return Err(ValidationError::EmptyLastName);
    }
    if fields.first_names.trim().is_empty() {
        return Err(ValidationError::EmptyFirstNames);
    }

    let birth_date = fields.birth_date.ok_or(ValidationError::MissingBirthDate)?;
    if birth_date > today {
        return Err(ValidationError::BirthDateInFuture { birth_date, today });
    }

    if fields.department.is_none() {
        return Err(ValidationError::MissingDepartment);
    }

    if let Some(email) = fields.email.as_deref() {
        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail(email.to_string()));
        }
    }
    if let Some(phone) = fields.phone.as_deref() {
        if !is_valid_phone(phone) {
            return Err(ValidationError::InvalidPhone(phone.to_string()));
        }
    }

    if fields.contract_renewal == Some(ContractRenewal::Yes) {
        if fields.renewal_duration.is_none() {
            return Err(ValidationError::MissingRenewalDuration);
        }
        if fields.entry_date.is_none() {
            return Err(ValidationError::MissingEntryDateForRenewal);
        }
        if let (Some(entry_date), Some(duration)) =
            (fields.entry_date, fields.renewal_duration)
        {
            renewal_end_date(entry_date, duration.months())?;
        }
    }

    if let (Some(entry_date), Some(end_date)) = (fields.entry_date, fields.end_date) {
        if end_date < entry_date {
            return Err(ValidationError::EndDateBeforeEntryDate {
                entry_date,
                end_date,
            });
        }
    }

    Ok(())
}

/// Applies the contract renewal derivation rule in place.
///
/// - `Yes` with entry date and duration: `end_date = entry_date + duration`.
/// - `No`: duration is cleared; `end_date` keeps its last explicit value.
/// - Otherwise nothing changes; missing inputs and unrepresentable end dates
///   are reported by `validate`.
pub fn apply_renewal_rules(fields: &mut InternFields) {
    match fields.contract_renewal {
        Some(ContractRenewal::Yes) => {
            if let (Some(entry_date), Some(duration)) =
                (fields.entry_date, fields.renewal_duration)
            {
                if let Ok(end_date) = renewal_end_date(entry_date, duration.months()) {
                    fields.end_date = Some(end_date);
                }
            }
        }
        Some(ContractRenewal::No) => {
            fields.renewal_duration = None;
        }
        None => {}
    }
}

fn renewal_end_date(entry_date: NaiveDate, months: u32) -> Result<NaiveDate, ValidationError> {
    entry_date
        .checked_add_months(Months::new(months))
        .ok_or(ValidationError::EndDateOutOfRange { entry_date, months })
}

/// Parses a calendar date typed by a user or sent over FFI.
///
/// Accepts `YYYY-MM-DD` and `DD/MM/YYYY`. `field` names the input in the
/// returned error.
pub fn parse_calendar_date(field: &'static str, raw: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| ValidationError::MalformedDate {
            field,
            value: trimmed.to_string(),
        })
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE_RE.is_match(value)
}
