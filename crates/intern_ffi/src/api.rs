//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Parse UI strings into core types and map every error to an envelope.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Record operations require an authenticated session.
//! - Configuration is resolved once per process and never re-read.

use chrono::NaiveDate;
use intern_core::db::open_db;
use intern_core::{
    core_version as core_version_inner, init_logging as init_logging_inner,
    parse_calendar_date, ping as ping_inner, write_export, AttachmentKind, ContractRenewal,
    CoreConfig, Department, EntryDateOrder, InternFields, InternListQuery, InternPatch,
    InternRecord, InternService, KvInternRepository, RenewalDuration, Session, SqliteKvStore,
};
use log::warn;
use std::str::FromStr;
use std::sync::OnceLock;

static FFI_CONFIG: OnceLock<Result<CoreConfig, String>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Session response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Session state after the call.
    pub authenticated: bool,
    pub message: String,
}

/// History line attached to a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternHistoryItem {
    /// UTC instant as Unix epoch milliseconds.
    pub timestamp_ms: i64,
    pub description: String,
}

/// Record projection sent to the UI. Dates are `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternItem {
    pub id: String,
    pub last_name: String,
    pub first_names: String,
    pub birth_date: String,
    pub department: String,
    pub mentor: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub social_security_number: Option<String>,
    pub entry_date: Option<String>,
    pub end_date: Option<String>,
    /// `Yes|No`.
    pub contract_renewal: Option<String>,
    /// Months: `1|3|6`.
    pub renewal_duration: Option<u32>,
    pub id_document_ref: Option<String>,
    pub birth_cert_ref: Option<String>,
    pub resume_ref: Option<String>,
    pub history: Vec<InternHistoryItem>,
}

/// Form values coming from the UI.
///
/// On create, `None` and blank strings both mean "not provided". On update,
/// `None` keeps the stored value and a blank string clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InternInput {
    pub last_name: Option<String>,
    pub first_names: Option<String>,
    /// `YYYY-MM-DD` or `DD/MM/YYYY`.
    pub birth_date: Option<String>,
    pub department: Option<String>,
    pub mentor: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub social_security_number: Option<String>,
    pub entry_date: Option<String>,
    pub end_date: Option<String>,
    pub contract_renewal: Option<String>,
    pub renewal_duration: Option<String>,
    pub id_document_ref: Option<String>,
    pub birth_cert_ref: Option<String>,
    pub resume_ref: Option<String>,
}

/// Single-record action envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternActionResponse {
    pub ok: bool,
    /// Updated record on success; `None` for failures and deletes.
    pub item: Option<InternItem>,
    pub message: String,
}

impl InternActionResponse {
    fn success(message: impl Into<String>, item: Option<InternItem>) -> Self {
        Self {
            ok: true,
            item,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            item: None,
            message: message.into(),
        }
    }
}

/// List page envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternListResponse {
    pub ok: bool,
    pub items: Vec<InternItem>,
    /// Effective 1-based page.
    pub page: u32,
    /// Effective page size after normalization.
    pub page_size: u32,
    /// Matching records across all pages.
    pub total: u32,
    pub has_next: bool,
    pub message: String,
}

impl InternListResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            items: Vec::new(),
            page: 1,
            page_size: 0,
            total: 0,
            has_next: false,
            message: message.into(),
        }
    }
}

/// Export envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResponse {
    pub ok: bool,
    /// Path the export was written to.
    pub path: Option<String>,
    pub message: String,
}

/// Reports the current session state.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn session_status() -> SessionResponse {
    let result = with_store(|store, config| {
        let session = Session::init(store, config.credentials().clone())
            .map_err(|err| err.to_string())?;
        Ok(session.is_authenticated())
    });
    match result {
        Ok(authenticated) => SessionResponse {
            ok: true,
            authenticated,
            message: String::new(),
        },
        Err(err) => SessionResponse {
            ok: false,
            authenticated: false,
            message: format!("session_status failed: {err}"),
        },
    }
}

/// Logs in with fixed credentials and persists a session token.
#[flutter_rust_bridge::frb(sync)]
pub fn session_login(username: String, password: String) -> SessionResponse {
    let result = with_store(|store, config| {
        let mut session = Session::init(store, config.credentials().clone())
            .map_err(|err| err.to_string())?;
        let outcome = session
            .login(username.trim(), password.as_str())
            .map_err(|err| err.to_string());
        Ok((outcome, session.is_authenticated()))
    });
    match result {
        Ok((Ok(()), authenticated)) => SessionResponse {
            ok: true,
            authenticated,
            message: "Logged in.".to_string(),
        },
        Ok((Err(err), authenticated)) => SessionResponse {
            ok: false,
            authenticated,
            message: format!("session_login failed: {err}"),
        },
        Err(err) => SessionResponse {
            ok: false,
            authenticated: false,
            message: format!("session_login failed: {err}"),
        },
    }
}

/// Clears the session token. Logging out twice is harmless.
#[flutter_rust_bridge::frb(sync)]
pub fn session_logout() -> SessionResponse {
    let result = with_store(|store, config| {
        let mut session = Session::init(store, config.credentials().clone())
            .map_err(|err| err.to_string())?;
        session.logout().map_err(|err| err.to_string())
    });
    match result {
        Ok(()) => SessionResponse {
            ok: true,
            authenticated: false,
            message: "Logged out.".to_string(),
        },
        Err(err) => SessionResponse {
            ok: false,
            authenticated: false,
            message: format!("session_logout failed: {err}"),
        },
    }
}

/// Creates a record from form input.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Returns the stored record (with id and first history entry) on success.
#[flutter_rust_bridge::frb(sync)]
pub fn intern_create(input: InternInput) -> InternActionResponse {
    let result = fields_from_input(input).and_then(|fields| {
        with_service(|service| service.create_intern(fields).map_err(|err| err.to_string()))
    });
    match result {
        Ok(record) => InternActionResponse::success("Intern created.", Some(to_item(record))),
        Err(err) => InternActionResponse::failure(format!("intern_create failed: {err}")),
    }
}

/// Lists one page of records.
///
/// Input semantics:
/// - `search`: case-insensitive last-name or id fragment; blank means all.
/// - `sort`: `asc|desc` on entry date; `None` keeps stored order.
/// - `page`: 1-based; `page_size` defaults to 10 and is clamped to 50.
#[flutter_rust_bridge::frb(sync)]
pub fn intern_list(
    search: Option<String>,
    sort: Option<String>,
    page: u32,
    page_size: Option<u32>,
) -> InternListResponse {
    let query = match build_query(search, sort, page, page_size) {
        Ok(query) => query,
        Err(err) => return InternListResponse::failure(format!("intern_list failed: {err}")),
    };

    match with_service(|service| service.list_page(&query).map_err(|err| err.to_string())) {
        Ok(page) => {
            let message = if page.total == 0 {
                "No interns.".to_string()
            } else {
                format!("Found {} intern(s).", page.total)
            };
            InternListResponse {
                ok: true,
                items: page.items.into_iter().map(to_item).collect(),
                page: page.page,
                page_size: page.page_size,
                total: u32::try_from(page.total).unwrap_or(u32::MAX),
                has_next: page.has_next,
                message,
            }
        }
        Err(err) => InternListResponse::failure(format!("intern_list failed: {err}")),
    }
}

/// Saves field changes for one record.
///
/// Input semantics:
/// - `change_description`: history line for this change; blank or `None`
///   records the edit-form default.
#[flutter_rust_bridge::frb(sync)]
pub fn intern_update(
    id: String,
    input: InternInput,
    change_description: Option<String>,
) -> InternActionResponse {
    let result = patch_from_input(input).and_then(|patch| {
        with_service(|service| {
            let outcome = match non_blank(change_description) {
                Some(description) => service.update_intern(id.trim(), patch, &description),
                None => service.save_form(id.trim(), patch),
            };
            outcome.map_err(|err| err.to_string())
        })
    });
    match result {
        Ok(record) => InternActionResponse::success("Intern updated.", Some(to_item(record))),
        Err(err) => InternActionResponse::failure(format!("intern_update failed: {err}")),
    }
}

/// Deletes a record. Deleting an unknown id succeeds.
#[flutter_rust_bridge::frb(sync)]
pub fn intern_delete(id: String) -> InternActionResponse {
    match with_service(|service| service.delete_intern(id.trim()).map_err(|err| err.to_string())) {
        Ok(()) => InternActionResponse::success("Intern deleted.", None),
        Err(err) => InternActionResponse::failure(format!("intern_delete failed: {err}")),
    }
}

/// Clears one attachment slot (`idDocument|birthCert|resume`).
#[flutter_rust_bridge::frb(sync)]
pub fn intern_clear_attachment(id: String, kind: String) -> InternActionResponse {
    let result = AttachmentKind::from_str(kind.as_str())
        .map_err(|err| err.to_string())
        .and_then(|kind| {
            with_service(|service| {
                service
                    .clear_attachment(id.trim(), kind)
                    .map_err(|err| err.to_string())
            })
        });
    match result {
        Ok(record) => InternActionResponse::success("Attachment cleared.", Some(to_item(record))),
        Err(err) => InternActionResponse::failure(format!("intern_clear_attachment failed: {err}")),
    }
}

/// Writes the CSV export of all records to `out_path`.
#[flutter_rust_bridge::frb(sync)]
pub fn intern_export_csv(out_path: String) -> ExportResponse {
    let result = with_service(|service| service.export_csv().map_err(|err| err.to_string()))
        .and_then(|csv| write_export(out_path.trim(), &csv).map_err(|err| err.to_string()));
    export_response("intern_export_csv", out_path, result)
}

/// Writes the table document of the current view to `out_path`.
#[flutter_rust_bridge::frb(sync)]
pub fn intern_export_table(
    out_path: String,
    search: Option<String>,
    sort: Option<String>,
) -> ExportResponse {
    let result = build_query(search, sort, 1, None)
        .and_then(|query| {
            with_service(|service| service.export_table(&query).map_err(|err| err.to_string()))
        })
        .and_then(|html| write_export(out_path.trim(), &html).map_err(|err| err.to_string()));
    export_response("intern_export_table", out_path, result)
}

fn export_response(operation: &str, out_path: String, result: Result<(), String>) -> ExportResponse {
    match result {
        Ok(()) => ExportResponse {
            ok: true,
            path: Some(out_path.trim().to_string()),
            message: "Export written.".to_string(),
        },
        Err(err) => ExportResponse {
            ok: false,
            path: None,
            message: format!("{operation} failed: {err}"),
        },
    }
}

fn resolve_config() -> Result<&'static CoreConfig, String> {
    FFI_CONFIG
        .get_or_init(|| CoreConfig::from_env().map_err(|err| err.to_string()))
        .as_ref()
        .map_err(Clone::clone)
}

fn with_store<T>(
    f: impl FnOnce(&SqliteKvStore<'_>, &CoreConfig) -> Result<T, String>,
) -> Result<T, String> {
    let config = resolve_config()?;
    let conn = open_db(config.db_path()).map_err(|err| {
        warn!("event=ffi_db_open module=ffi status=error");
        format!("DB open failed: {err}")
    })?;
    let store =
        SqliteKvStore::try_new(&conn).map_err(|err| format!("store init failed: {err}"))?;
    f(&store, config)
}

fn with_service<T>(
    f: impl FnOnce(&InternService<KvInternRepository<'_, SqliteKvStore<'_>>>) -> Result<T, String>,
) -> Result<T, String> {
    with_store(|store, config| {
        let session = Session::init(store, config.credentials().clone())
            .map_err(|err| err.to_string())?;
        session.ensure_authenticated().map_err(|err| {
            warn!("event=ffi_record_call module=ffi status=error error_code=not_authenticated");
            err.to_string()
        })?;
        let service = InternService::new(KvInternRepository::new(store));
        f(&service)
    })
}

fn build_query(
    search: Option<String>,
    sort: Option<String>,
    page: u32,
    page_size: Option<u32>,
) -> Result<InternListQuery, String> {
    let sort = match non_blank(sort) {
        None => None,
        Some(raw) => Some(parse_sort(&raw)?),
    };
    Ok(InternListQuery {
        search: non_blank(search),
        sort,
        page,
        page_size,
    })
}

fn parse_sort(raw: &str) -> Result<EntryDateOrder, String> {
    match raw.to_ascii_lowercase().as_str() {
        "asc" | "ascending" => Ok(EntryDateOrder::Ascending),
        "desc" | "descending" => Ok(EntryDateOrder::Descending),
        _ => Err(format!("unknown sort order `{raw}`: expected asc or desc")),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

fn parse_optional<T>(
    value: Option<String>,
    parse: impl FnOnce(&str) -> Result<T, String>,
) -> Result<Option<T>, String> {
    non_blank(value).map(|raw| parse(&raw)).transpose()
}

/// Update semantics: `None` keeps, blank clears, anything else replaces.
fn patch_slot<T>(
    value: Option<String>,
    parse: impl FnOnce(&str) -> Result<T, String>,
) -> Result<Option<Option<T>>, String> {
    match value {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(Some(None)),
        Some(raw) => parse(raw.trim()).map(|parsed| Some(Some(parsed))),
    }
}

fn text(raw: &str) -> Result<String, String> {
    Ok(raw.to_string())
}

fn date_parser(field: &'static str) -> impl Fn(&str) -> Result<NaiveDate, String> {
    move |raw| parse_calendar_date(field, raw).map_err(|err| err.to_string())
}

fn enum_parser<T>(raw: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: ToString,
{
    T::from_str(raw).map_err(|err| err.to_string())
}

fn fields_from_input(input: InternInput) -> Result<InternFields, String> {
    Ok(InternFields {
        last_name: input.last_name.unwrap_or_default(),
        first_names: input.first_names.unwrap_or_default(),
        birth_date: parse_optional(input.birth_date, date_parser("birthDate"))?,
        department: parse_optional(input.department, enum_parser::<Department>)?,
        mentor: non_blank(input.mentor),
        email: non_blank(input.email),
        phone: non_blank(input.phone),
        social_security_number: non_blank(input.social_security_number),
        entry_date: parse_optional(input.entry_date, date_parser("entryDate"))?,
        end_date: parse_optional(input.end_date, date_parser("endDate"))?,
        contract_renewal: parse_optional(input.contract_renewal, enum_parser::<ContractRenewal>)?,
        renewal_duration: parse_optional(input.renewal_duration, enum_parser::<RenewalDuration>)?,
        id_document_ref: non_blank(input.id_document_ref),
        birth_cert_ref: non_blank(input.birth_cert_ref),
        resume_ref: non_blank(input.resume_ref),
    })
}

fn patch_from_input(input: InternInput) -> Result<InternPatch, String> {
    Ok(InternPatch {
        last_name: input.last_name,
        first_names: input.first_names,
        birth_date: parse_optional(input.birth_date, date_parser("birthDate"))?,
        department: parse_optional(input.department, enum_parser::<Department>)?,
        mentor: patch_slot(input.mentor, text)?,
        email: patch_slot(input.email, text)?,
        phone: patch_slot(input.phone, text)?,
        social_security_number: patch_slot(input.social_security_number, text)?,
        entry_date: patch_slot(input.entry_date, date_parser("entryDate"))?,
        end_date: patch_slot(input.end_date, date_parser("endDate"))?,
        contract_renewal: patch_slot(input.contract_renewal, enum_parser::<ContractRenewal>)?,
        renewal_duration: patch_slot(input.renewal_duration, enum_parser::<RenewalDuration>)?,
        id_document_ref: patch_slot(input.id_document_ref, text)?,
        birth_cert_ref: patch_slot(input.birth_cert_ref, text)?,
        resume_ref: patch_slot(input.resume_ref, text)?,
    })
}

fn to_item(record: InternRecord) -> InternItem {
    InternItem {
        id: record.id,
        last_name: record.last_name,
        first_names: record.first_names,
        birth_date: record.birth_date.to_string(),
        department: record.department.as_str().to_string(),
        mentor: record.mentor,
        email: record.email,
        phone: record.phone,
        social_security_number: record.social_security_number,
        entry_date: record.entry_date.map(|date| date.to_string()),
        end_date: record.end_date.map(|date| date.to_string()),
        contract_renewal: record
            .contract_renewal
            .map(|value| value.as_str().to_string()),
        renewal_duration: record.renewal_duration.map(|value| value.months()),
        id_document_ref: record.id_document_ref,
        birth_cert_ref: record.birth_cert_ref,
        resume_ref: record.resume_ref,
        history: record
            .history
            .into_iter()
            .map(|entry| InternHistoryItem {
                timestamp_ms: entry.timestamp.timestamp_millis(),
                description: entry.description,
            })
            .collect(),
    }
}
