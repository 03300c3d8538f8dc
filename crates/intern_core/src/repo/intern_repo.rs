//! Intern repository contracts and key-value store implementation.
//!
//! # Responsibility
//! - Own the canonical intern collection persisted under one store key.
//! - Run every operation as a full read-modify-write cycle.
//! - Append exactly one history entry per persisted mutation.
//!
//! # Invariants
//! - Write paths apply the renewal rule and the validation policy before
//!   touching the store. Updates re-derive `end_date` only when a
//!   renewal input changed.
//! - Read paths reject malformed blobs (`CorruptData`) instead of masking
//!   or discarding them.
//! - A failed operation never writes; a successful one rewrites the whole
//!   collection in a single `set`.

use crate::model::intern::{
    AttachmentKind, HistoryEntry, InternFields, InternId, InternPatch, InternRecord,
};
use crate::model::validation::{apply_renewal_rules, validate, ValidationError};
use crate::store::{KeyValueStore, StoreError};
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;
use uuid::Uuid;

/// Store key holding the serialized collection.
pub const INTERNS_KEY: &str = "@interns";
/// History description seeded on creation.
pub const CREATED_DESCRIPTION: &str = "created";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for intern persistence operations.
#[derive(Debug)]
pub enum RepoError {
    /// Input rejected by the validation policy.
    Validation(ValidationError),
    /// No record carries the requested id.
    NotFound(InternId),
    /// Stored collection could not be decoded.
    CorruptData(String),
    /// Backing store could not be reached.
    StorageUnavailable(StoreError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "intern not found: {id}"),
            Self::CorruptData(details) => write!(f, "corrupt intern data: {details}"),
            Self::StorageUnavailable(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::StorageUnavailable(err) => Some(err),
            Self::NotFound(_) | Self::CorruptData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::StorageUnavailable(value)
    }
}

/// Repository interface for intern records.
pub trait InternRepository {
    /// Returns every record in persisted insertion order.
    fn list(&self) -> RepoResult<Vec<InternRecord>>;
    /// Returns one record by id.
    fn get(&self, id: &str) -> RepoResult<Option<InternRecord>>;
    /// Validates and appends a new record; returns it with its assigned id.
    fn create(&self, fields: InternFields) -> RepoResult<InternRecord>;
    /// Merges `patch`, re-validates and appends `change_description` to history.
    fn update(
        &self,
        id: &str,
        patch: InternPatch,
        change_description: &str,
    ) -> RepoResult<InternRecord>;
    /// Removes a record. Absent ids are a no-op.
    fn delete(&self, id: &str) -> RepoResult<()>;
    /// Clears one attachment reference and records it in history.
    fn clear_attachment(&self, id: &str, kind: AttachmentKind) -> RepoResult<InternRecord>;
}

/// Repository persisting the collection as one JSON blob in a key-value store.
pub struct KvInternRepository<'s, S: KeyValueStore + ?Sized> {
    store: &'s S,
}

impl<'s, S: KeyValueStore + ?Sized> KvInternRepository<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    fn load(&self) -> RepoResult<Vec<InternRecord>> {
        let raw = self.store.get(INTERNS_KEY).map_err(|err| {
            warn!("event=intern_load module=repo status=error error_code=storage_unavailable error={err}");
            RepoError::from(err)
        })?;

        match raw {
            None => Ok(Vec::new()),
            Some(json) => decode_collection(&json).map_err(|err| {
                error!("event=intern_load module=repo status=error error_code=corrupt_data error={err}");
                err
            }),
        }
    }

    fn save(&self, records: &[InternRecord]) -> RepoResult<()> {
        let json = encode_collection(records)?;
        self.store.set(INTERNS_KEY, &json).map_err(|err| {
            warn!("event=intern_save module=repo status=error error_code=storage_unavailable error={err}");
            RepoError::from(err)
        })
    }
}

impl<S: KeyValueStore + ?Sized> InternRepository for KvInternRepository<'_, S> {
    fn list(&self) -> RepoResult<Vec<InternRecord>> {
        self.load()
    }

    fn get(&self, id: &str) -> RepoResult<Option<InternRecord>> {
        Ok(self.load()?.into_iter().find(|record| record.id == id))
    }

    fn create(&self, mut fields: InternFields) -> RepoResult<InternRecord> {
        let started_at = Instant::now();
        apply_renewal_rules(&mut fields);
        validate(&fields)?;

        let mut records = self.load()?;
        let record = InternRecord::from_fields(
            new_intern_id(),
            fields,
            vec![HistoryEntry::now(CREATED_DESCRIPTION)],
        )?;
        records.push(record.clone());
        self.save(&records)?;

        info!(
            "event=intern_create module=repo status=ok intern_id={} records={} duration_ms={}",
            record.id,
            records.len(),
            started_at.elapsed().as_millis()
        );
        Ok(record)
    }

    fn update(
        &self,
        id: &str,
        patch: InternPatch,
        change_description: &str,
    ) -> RepoResult<InternRecord> {
        let started_at = Instant::now();
        let mut records = self.load()?;
        let index = records
            .iter()
            .position(|record| record.id == id)
            .ok_or_else(|| RepoError::NotFound(id.to_string()))?;

        let current = &records[index];
        let mut merged = current.fields();
        patch.apply_to(&mut merged);
        // An explicit end date survives unless a renewal input changed.
        if merged.entry_date != current.entry_date
            || merged.renewal_duration != current.renewal_duration
            || merged.contract_renewal != current.contract_renewal
        {
            apply_renewal_rules(&mut merged);
        }
        validate(&merged)?;

        let mut history = current.history.clone();
        history.push(HistoryEntry::now(change_description));
        let updated = InternRecord::from_fields(current.id.clone(), merged, history)?;
        records[index] = updated.clone();
        self.save(&records)?;

        info!(
            "event=intern_update module=repo status=ok intern_id={id} history_len={} duration_ms={}",
            updated.history.len(),
            started_at.elapsed().as_millis()
        );
        Ok(updated)
    }

    fn delete(&self, id: &str) -> RepoResult<()> {
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|record| record.id != id);
        if records.len() == before {
            debug!("event=intern_delete module=repo status=noop intern_id={id}");
            return Ok(());
        }

        self.save(&records)?;
        info!(
            "event=intern_delete module=repo status=ok intern_id={id} records={}",
            records.len()
        );
        Ok(())
    }

    fn clear_attachment(&self, id: &str, kind: AttachmentKind) -> RepoResult<InternRecord> {
        self.update(
            id,
            InternPatch::clear_attachment(kind),
            &format!("cleared attachment: {kind}"),
        )
    }
}

/// Decodes a stored collection blob.
///
/// # Errors
/// - `CorruptData` on malformed JSON, unknown enum values or duplicate ids.
pub fn decode_collection(json: &str) -> RepoResult<Vec<InternRecord>> {
    let records: Vec<InternRecord> =
        serde_json::from_str(json).map_err(|err| RepoError::CorruptData(err.to_string()))?;

    let mut seen = HashSet::with_capacity(records.len());
    for record in &records {
        if !seen.insert(record.id.as_str()) {
            return Err(RepoError::CorruptData(format!(
                "duplicate intern id `{}`",
                record.id
            )));
        }
    }
    Ok(records)
}

/// Encodes a collection into its stored JSON form, preserving order.
pub fn encode_collection(records: &[InternRecord]) -> RepoResult<String> {
    serde_json::to_string(records)
        .map_err(|err| RepoError::CorruptData(format!("failed to encode collection: {err}")))
}

fn new_intern_id() -> InternId {
    Uuid::new_v4().to_string()
}
