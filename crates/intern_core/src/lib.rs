//! Core domain logic for intern record management.
//! This crate is the single source of truth for business invariants.

pub mod config;
pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod session;
pub mod store;

pub use config::{ConfigError, CoreConfig};
pub use export::{render_csv, render_table, write_export, ExportError};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::intern::{
    AttachmentKind, ContractRenewal, Department, HistoryEntry, InternFields, InternId,
    InternPatch, InternRecord, RenewalDuration,
};
pub use model::validation::{
    apply_renewal_rules, parse_calendar_date, validate, validate_at, ValidationError,
};
pub use repo::intern_repo::{InternRepository, KvInternRepository, RepoError, RepoResult};
pub use service::intern_service::InternService;
pub use service::list_view::{EntryDateOrder, InternListPage, InternListQuery};
pub use session::{CredentialPolicy, FixedCredentials, Session, SessionError, SessionState};
pub use store::{KeyValueStore, MemoryKvStore, SqliteKvStore, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
