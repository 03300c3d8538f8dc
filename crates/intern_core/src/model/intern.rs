//! Intern record domain model.
//!
//! # Responsibility
//! - Define the canonical persisted record and its caller-facing input shapes
//!   (`InternFields` for create, `InternPatch` for partial update).
//! - Define the closed enumerations (department, renewal, attachment kind).
//!
//! # Invariants
//! - `id` is assigned once at creation and never changes.
//! - `history` is append-only; it only disappears with the whole record.
//! - `department` is always one of the enumerated units.

use crate::model::validation::ValidationError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Opaque record identifier.
///
/// Kept as a string so collections written by older clients (timestamp ids)
/// still load.
pub type InternId = String;

/// Organizational unit an intern is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    #[serde(rename = "MARKETING")]
    Marketing,
    #[serde(rename = "JURIDIQUE")]
    Juridique,
    #[serde(rename = "INFORMATIQUE")]
    Informatique,
    #[serde(rename = "COMPTABILITE")]
    Comptabilite,
    #[serde(rename = "RH")]
    Rh,
    #[serde(rename = "COTON")]
    Coton,
    #[serde(rename = "CREDIT SUPPORT")]
    CreditSupport,
    #[serde(rename = "APPUIE TECHNIQUE")]
    AppuieTechnique,
}

impl Department {
    /// Every known unit, in display order.
    pub const ALL: [Department; 8] = [
        Self::Marketing,
        Self::Juridique,
        Self::Informatique,
        Self::Comptabilite,
        Self::Rh,
        Self::Coton,
        Self::CreditSupport,
        Self::AppuieTechnique,
    ];

    /// Stable label, identical to the persisted value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Marketing => "MARKETING",
            Self::Juridique => "JURIDIQUE",
            Self::Informatique => "INFORMATIQUE",
            Self::Comptabilite => "COMPTABILITE",
            Self::Rh => "RH",
            Self::Coton => "COTON",
            Self::CreditSupport => "CREDIT SUPPORT",
            Self::AppuieTechnique => "APPUIE TECHNIQUE",
        }
    }
}

impl Display for Department {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Department {
    type Err = ValidationError;

    /// Case-insensitive; `_` and `-` are accepted in place of spaces.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_uppercase().replace(['_', '-'], " ");
        Self::ALL
            .into_iter()
            .find(|department| department.as_str() == normalized)
            .ok_or_else(|| ValidationError::UnknownDepartment(value.trim().to_string()))
    }
}

/// Whether the contract is renewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractRenewal {
    Yes,
    No,
}

impl ContractRenewal {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }
}

impl FromStr for ContractRenewal {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" | "oui" => Ok(Self::Yes),
            "no" | "n" | "non" => Ok(Self::No),
            _ => Err(ValidationError::UnknownContractRenewal(
                value.trim().to_string(),
            )),
        }
    }
}

/// Length of a contract renewal. Persisted as a month count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum RenewalDuration {
    OneMonth,
    ThreeMonths,
    SixMonths,
}

impl RenewalDuration {
    pub fn months(self) -> u32 {
        match self {
            Self::OneMonth => 1,
            Self::ThreeMonths => 3,
            Self::SixMonths => 6,
        }
    }
}

impl TryFrom<u32> for RenewalDuration {
    type Error = ValidationError;

    fn try_from(months: u32) -> Result<Self, Self::Error> {
        match months {
            1 => Ok(Self::OneMonth),
            3 => Ok(Self::ThreeMonths),
            6 => Ok(Self::SixMonths),
            other => Err(ValidationError::UnknownRenewalDuration(other.to_string())),
        }
    }
}

impl From<RenewalDuration> for u32 {
    fn from(value: RenewalDuration) -> Self {
        value.months()
    }
}

impl FromStr for RenewalDuration {
    type Err = ValidationError;

    /// Accepts `1`, `3`, `6`, optionally suffixed with `m`/`months`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim().to_ascii_lowercase();
        let digits = trimmed
            .trim_end_matches("months")
            .trim_end_matches("month")
            .trim_end_matches('m')
            .trim();
        digits
            .parse::<u32>()
            .map_err(|_| ValidationError::UnknownRenewalDuration(value.trim().to_string()))
            .and_then(Self::try_from)
    }
}

/// Attachment slot on a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttachmentKind {
    IdDocument,
    BirthCert,
    Resume,
}

impl AttachmentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IdDocument => "idDocument",
            Self::BirthCert => "birthCert",
            Self::Resume => "resume",
        }
    }
}

impl Display for AttachmentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttachmentKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace(['_', '-'], "").as_str() {
            "iddocument" | "cni" => Ok(Self::IdDocument),
            "birthcert" | "extrait" => Ok(Self::BirthCert),
            "resume" | "cv" => Ok(Self::Resume),
            _ => Err(ValidationError::UnknownAttachmentKind(
                value.trim().to_string(),
            )),
        }
    }
}

/// One audit-trail line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// UTC instant, serialized as RFC 3339.
    pub timestamp: DateTime<Utc>,
    pub description: String,
}

impl HistoryEntry {
    /// Entry stamped with the current time.
    pub fn now(description: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            description: description.into(),
        }
    }
}

/// Caller-supplied field set for record creation.
///
/// Required fields are optional here on purpose: missing values are reported
/// by the validation policy with the rule that failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InternFields {
    pub last_name: String,
    pub first_names: String,
    pub birth_date: Option<NaiveDate>,
    pub department: Option<Department>,
    pub mentor: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub social_security_number: Option<String>,
    pub entry_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub contract_renewal: Option<ContractRenewal>,
    pub renewal_duration: Option<RenewalDuration>,
    pub id_document_ref: Option<String>,
    pub birth_cert_ref: Option<String>,
    pub resume_ref: Option<String>,
}

impl InternFields {
    /// Minimal field set carrying only the required values.
    pub fn new(
        last_name: impl Into<String>,
        first_names: impl Into<String>,
        birth_date: NaiveDate,
        department: Department,
    ) -> Self {
        Self {
            last_name: last_name.into(),
            first_names: first_names.into(),
            birth_date: Some(birth_date),
            department: Some(department),
            ..Self::default()
        }
    }
}

/// Partial update applied on top of a stored record.
///
/// `None` keeps the stored value. For nullable fields `Some(None)` clears the
/// value and `Some(Some(v))` replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InternPatch {
    pub last_name: Option<String>,
    pub first_names: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub department: Option<Department>,
    pub mentor: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub social_security_number: Option<Option<String>>,
    pub entry_date: Option<Option<NaiveDate>>,
    pub end_date: Option<Option<NaiveDate>>,
    pub contract_renewal: Option<Option<ContractRenewal>>,
    pub renewal_duration: Option<Option<RenewalDuration>>,
    pub id_document_ref: Option<Option<String>>,
    pub birth_cert_ref: Option<Option<String>>,
    pub resume_ref: Option<Option<String>>,
}

impl InternPatch {
    /// Merges this patch into `fields`.
    pub fn apply_to(self, fields: &mut InternFields) {
        fn merge<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        merge(&mut fields.last_name, self.last_name);
        merge(&mut fields.first_names, self.first_names);
        if self.birth_date.is_some() {
            fields.birth_date = self.birth_date;
        }
        if self.department.is_some() {
            fields.department = self.department;
        }
        merge(&mut fields.mentor, self.mentor);
        merge(&mut fields.email, self.email);
        merge(&mut fields.phone, self.phone);
        merge(
            &mut fields.social_security_number,
            self.social_security_number,
        );
        merge(&mut fields.entry_date, self.entry_date);
        merge(&mut fields.end_date, self.end_date);
        merge(&mut fields.contract_renewal, self.contract_renewal);
        merge(&mut fields.renewal_duration, self.renewal_duration);
        merge(&mut fields.id_document_ref, self.id_document_ref);
        merge(&mut fields.birth_cert_ref, self.birth_cert_ref);
        merge(&mut fields.resume_ref, self.resume_ref);
    }

    /// Patch that clears one attachment slot.
    pub fn clear_attachment(kind: AttachmentKind) -> Self {
        let mut patch = Self::default();
        match kind {
            AttachmentKind::IdDocument => patch.id_document_ref = Some(None),
            AttachmentKind::BirthCert => patch.birth_cert_ref = Some(None),
            AttachmentKind::Resume => patch.resume_ref = Some(None),
        }
        patch
    }
}

/// Canonical persisted intern record.
///
/// Serialized as a camelCase JSON object; absent optional values are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternRecord {
    pub id: InternId,
    pub last_name: String,
    pub first_names: String,
    pub birth_date: NaiveDate,
    pub department: Department,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_security_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_renewal: Option<ContractRenewal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renewal_duration: Option<RenewalDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_document_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_cert_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_ref: Option<String>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl InternRecord {
    /// Builds a record from validated fields.
    ///
    /// # Errors
    /// - `MissingBirthDate` / `MissingDepartment` when the required values are
    ///   absent. Callers run the validation policy first, so these only fire on
    ///   misuse.
    pub fn from_fields(
        id: InternId,
        fields: InternFields,
        history: Vec<HistoryEntry>,
    ) -> Result<Self, ValidationError> {
        let birth_date = fields.birth_date.ok_or(ValidationError::MissingBirthDate)?;
        let department = fields.department.ok_or(ValidationError::MissingDepartment)?;
        Ok(Self {
            id,
            last_name: fields.last_name,
            first_names: fields.first_names,
            birth_date,
            department,
            mentor: fields.mentor,
            email: fields.email,
            phone: fields.phone,
            social_security_number: fields.social_security_number,
            entry_date: fields.entry_date,
            end_date: fields.end_date,
            contract_renewal: fields.contract_renewal,
            renewal_duration: fields.renewal_duration,
            id_document_ref: fields.id_document_ref,
            birth_cert_ref: fields.birth_cert_ref,
            resume_ref: fields.resume_ref,
            history,
        })
    }

    /// Copies the editable fields out of this record.
    pub fn fields(&self) -> InternFields {
        InternFields {
            last_name: self.last_name.clone(),
            first_names: self.first_names.clone(),
            birth_date: Some(self.birth_date),
            department: Some(self.department),
            mentor: self.mentor.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            social_security_number: self.social_security_number.clone(),
            entry_date: self.entry_date,
            end_date: self.end_date,
            contract_renewal: self.contract_renewal,
            renewal_duration: self.renewal_duration,
            id_document_ref: self.id_document_ref.clone(),
            birth_cert_ref: self.birth_cert_ref.clone(),
            resume_ref: self.resume_ref.clone(),
        }
    }

    /// Returns the reference stored in one attachment slot.
    pub fn attachment(&self, kind: AttachmentKind) -> Option<&str> {
        match kind {
            AttachmentKind::IdDocument => self.id_document_ref.as_deref(),
            AttachmentKind::BirthCert => self.birth_cert_ref.as_deref(),
            AttachmentKind::Resume => self.resume_ref.as_deref(),
        }
    }
}
