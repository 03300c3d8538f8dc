//! Command-line entry point for intern records.
//!
//! # Responsibility
//! - Map subcommands onto core session, repository and export operations.
//! - Resolve configuration once at startup; `--db` overrides the database path.
//!
//! # Invariants
//! - Record commands run only with an authenticated session.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use intern_core::db::open_db;
use intern_core::{
    init_logging_from_config, parse_calendar_date, write_export, AttachmentKind, ContractRenewal,
    CoreConfig, Department, EntryDateOrder, InternFields, InternListQuery, InternPatch,
    InternRecord, InternService, KvInternRepository, RenewalDuration, Session, SqliteKvStore,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "interns")]
#[command(about = "Intern record management CLI")]
struct Cli {
    /// Database file (overrides INTERNS_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store a session token
    Login { username: String, password: String },
    /// Remove the session token
    Logout,
    /// Show session state and database path
    Status,
    /// Create an intern record
    Add {
        #[command(flatten)]
        record: RecordArgs,
    },
    /// List records, optionally searched and sorted by entry date
    List {
        /// Last name or id fragment
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_enum)]
        sort: Option<SortOrder>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// Show one record with its history
    Show { id: String },
    /// Update fields of a record
    Update {
        id: String,
        #[command(flatten)]
        record: RecordArgs,
        /// Optional field to clear (repeatable)
        #[arg(long, value_enum)]
        clear: Vec<ClearableField>,
        /// History description for this change
        #[arg(long)]
        note: Option<String>,
    },
    /// Delete a record
    Delete { id: String },
    /// Clear one attachment reference
    ClearAttachment {
        id: String,
        /// idDocument, birthCert or resume
        #[arg(value_parser = parse_attachment)]
        kind: AttachmentKind,
    },
    /// Write all records as CSV lines
    ExportCsv {
        /// Output file
        out: PathBuf,
    },
    /// Write the current view as an HTML table
    ExportTable {
        /// Output file
        out: PathBuf,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_enum)]
        sort: Option<SortOrder>,
    },
}

/// Field options shared by `add` and `update`.
#[derive(Args)]
struct RecordArgs {
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    first_names: Option<String>,
    /// YYYY-MM-DD or DD/MM/YYYY
    #[arg(long, value_parser = parse_birth_date)]
    birth_date: Option<NaiveDate>,
    #[arg(long, value_parser = parse_department)]
    department: Option<Department>,
    #[arg(long)]
    mentor: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    social_security_number: Option<String>,
    #[arg(long, value_parser = parse_entry_date)]
    entry_date: Option<NaiveDate>,
    #[arg(long, value_parser = parse_end_date)]
    end_date: Option<NaiveDate>,
    /// Yes or No
    #[arg(long, value_parser = parse_contract_renewal)]
    contract_renewal: Option<ContractRenewal>,
    /// 1, 3 or 6 months
    #[arg(long, value_parser = parse_renewal_duration)]
    renewal_duration: Option<RenewalDuration>,
    #[arg(long)]
    id_document: Option<String>,
    #[arg(long)]
    birth_cert: Option<String>,
    #[arg(long)]
    resume: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortOrder {
    Asc,
    Desc,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ClearableField {
    Mentor,
    Email,
    Phone,
    SocialSecurityNumber,
    EntryDate,
    EndDate,
    ContractRenewal,
    RenewalDuration,
    IdDocument,
    BirthCert,
    Resume,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = CoreConfig::from_env()?;
    if let Some(db) = cli.db {
        config = config.with_db_path(db)?;
    }
    init_logging_from_config(&config)?;

    let conn = open_db(config.db_path())?;
    let store = SqliteKvStore::try_new(&conn)?;
    let mut session = Session::init(&store, config.credentials().clone())?;

    match cli.command {
        Commands::Login { username, password } => {
            session.login(username.trim(), &password)?;
            println!("Logged in.");
            return Ok(());
        }
        Commands::Logout => {
            session.logout()?;
            println!("Logged out.");
            return Ok(());
        }
        Commands::Status => {
            let state = if session.is_authenticated() {
                "authenticated"
            } else {
                "not authenticated"
            };
            println!("Session: {state}");
            println!("Database: {}", config.db_path().display());
            return Ok(());
        }
        _ => session.ensure_authenticated()?,
    }

    let service = InternService::new(KvInternRepository::new(&store));
    match cli.command {
        Commands::Add { record } => {
            let created = service.create_intern(record.into_fields())?;
            println!("Created intern with ID: {}", created.id);
        }
        Commands::List {
            search,
            sort,
            page,
            page_size,
        } => {
            let page = service.list_page(&InternListQuery {
                search,
                sort: sort.map(SortOrder::into_order),
                page,
                page_size,
            })?;
            if page.items.is_empty() {
                println!("No interns found.");
            }
            for record in &page.items {
                println!("{}", summary_line(record));
            }
            println!(
                "Page {} ({} per page), {} match(es){}",
                page.page,
                page.page_size,
                page.total,
                if page.has_next { ", more available" } else { "" }
            );
        }
        Commands::Show { id } => match service.get_intern(&id)? {
            Some(record) => print_record(&record),
            None => println!("No intern with ID: {id}"),
        },
        Commands::Update {
            id,
            record,
            clear,
            note,
        } => {
            let patch = record.into_patch(&clear);
            let updated = match note {
                Some(note) => service.update_intern(&id, patch, &note)?,
                None => service.save_form(&id, patch)?,
            };
            println!("Updated intern with ID: {}", updated.id);
        }
        Commands::Delete { id } => {
            service.delete_intern(&id)?;
            println!("Deleted intern with ID: {id}");
        }
        Commands::ClearAttachment { id, kind } => {
            service.clear_attachment(&id, kind)?;
            println!("Cleared {kind} for intern with ID: {id}");
        }
        Commands::ExportCsv { out } => {
            write_export(&out, &service.export_csv()?)?;
            println!("Wrote {}", out.display());
        }
        Commands::ExportTable { out, search, sort } => {
            let html = service.export_table(&InternListQuery {
                search,
                sort: sort.map(SortOrder::into_order),
                ..InternListQuery::default()
            })?;
            write_export(&out, &html)?;
            println!("Wrote {}", out.display());
        }
        Commands::Login { .. } | Commands::Logout | Commands::Status => {}
    }

    Ok(())
}

impl SortOrder {
    fn into_order(self) -> EntryDateOrder {
        match self {
            Self::Asc => EntryDateOrder::Ascending,
            Self::Desc => EntryDateOrder::Descending,
        }
    }
}

impl RecordArgs {
    fn into_fields(self) -> InternFields {
        InternFields {
            last_name: self.last_name.unwrap_or_default(),
            first_names: self.first_names.unwrap_or_default(),
            birth_date: self.birth_date,
            department: self.department,
            mentor: self.mentor,
            email: self.email,
            phone: self.phone,
            social_security_number: self.social_security_number,
            entry_date: self.entry_date,
            end_date: self.end_date,
            contract_renewal: self.contract_renewal,
            renewal_duration: self.renewal_duration,
            id_document_ref: self.id_document,
            birth_cert_ref: self.birth_cert,
            resume_ref: self.resume,
        }
    }

    fn into_patch(self, clear: &[ClearableField]) -> InternPatch {
        InternPatch {
            last_name: self.last_name,
            first_names: self.first_names,
            birth_date: self.birth_date,
            department: self.department,
            mentor: clear_or(clear, ClearableField::Mentor, self.mentor),
            email: clear_or(clear, ClearableField::Email, self.email),
            phone: clear_or(clear, ClearableField::Phone, self.phone),
            social_security_number: clear_or(
                clear,
                ClearableField::SocialSecurityNumber,
                self.social_security_number,
            ),
            entry_date: clear_or(clear, ClearableField::EntryDate, self.entry_date),
            end_date: clear_or(clear, ClearableField::EndDate, self.end_date),
            contract_renewal: clear_or(
                clear,
                ClearableField::ContractRenewal,
                self.contract_renewal,
            ),
            renewal_duration: clear_or(
                clear,
                ClearableField::RenewalDuration,
                self.renewal_duration,
            ),
            id_document_ref: clear_or(clear, ClearableField::IdDocument, self.id_document),
            birth_cert_ref: clear_or(clear, ClearableField::BirthCert, self.birth_cert),
            resume_ref: clear_or(clear, ClearableField::Resume, self.resume),
        }
    }
}

/// `--clear` wins over a value given for the same field.
fn clear_or<T>(
    clear: &[ClearableField],
    field: ClearableField,
    value: Option<T>,
) -> Option<Option<T>> {
    if clear.contains(&field) {
        Some(None)
    } else {
        value.map(Some)
    }
}

fn summary_line(record: &InternRecord) -> String {
    format!(
        "ID: {}, Name: {} {}, Department: {}, Entry: {}",
        record.id,
        record.last_name,
        record.first_names,
        record.department,
        record
            .entry_date
            .map(|date| date.to_string())
            .unwrap_or_else(|| "-".to_string())
    )
}

fn print_record(record: &InternRecord) {
    let show = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());
    println!("ID: {}", record.id);
    println!("Last name: {}", record.last_name);
    println!("First names: {}", record.first_names);
    println!("Birth date: {}", record.birth_date);
    println!("Department: {}", record.department);
    println!("Mentor: {}", show(record.mentor.clone()));
    println!("Email: {}", show(record.email.clone()));
    println!("Phone: {}", show(record.phone.clone()));
    println!(
        "Social security number: {}",
        show(record.social_security_number.clone())
    );
    println!("Entry date: {}", show(record.entry_date.map(|d| d.to_string())));
    println!("End date: {}", show(record.end_date.map(|d| d.to_string())));
    println!(
        "Contract renewal: {}",
        show(record.contract_renewal.map(|v| v.as_str().to_string()))
    );
    println!(
        "Renewal duration: {}",
        show(record.renewal_duration.map(|v| format!("{} month(s)", v.months())))
    );
    for kind in [
        AttachmentKind::IdDocument,
        AttachmentKind::BirthCert,
        AttachmentKind::Resume,
    ] {
        println!("{kind}: {}", show(record.attachment(kind).map(str::to_string)));
    }
    println!("History:");
    for entry in &record.history {
        println!("  {} {}", entry.timestamp.to_rfc3339(), entry.description);
    }
}

fn parse_birth_date(raw: &str) -> Result<NaiveDate, String> {
    parse_calendar_date("birthDate", raw).map_err(|err| err.to_string())
}

fn parse_entry_date(raw: &str) -> Result<NaiveDate, String> {
    parse_calendar_date("entryDate", raw).map_err(|err| err.to_string())
}

fn parse_end_date(raw: &str) -> Result<NaiveDate, String> {
    parse_calendar_date("endDate", raw).map_err(|err| err.to_string())
}

fn parse_department(raw: &str) -> Result<Department, String> {
    raw.parse().map_err(|err: intern_core::ValidationError| err.to_string())
}

fn parse_contract_renewal(raw: &str) -> Result<ContractRenewal, String> {
    raw.parse().map_err(|err: intern_core::ValidationError| err.to_string())
}

fn parse_renewal_duration(raw: &str) -> Result<RenewalDuration, String> {
    raw.parse().map_err(|err: intern_core::ValidationError| err.to_string())
}

fn parse_attachment(raw: &str) -> Result<AttachmentKind, String> {
    raw.parse().map_err(|err: intern_core::ValidationError| err.to_string())
}
