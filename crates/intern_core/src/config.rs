//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into
//! core services. Operations never read environment variables themselves.

use crate::logging::default_log_level;
use crate::session::{FixedCredentials, DEFAULT_PASSWORD, DEFAULT_USERNAME};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_DB_PATH: &str = "INTERNS_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "INTERNS_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "INTERNS_LOG_DIR";
pub const ENV_ADMIN_USERNAME: &str = "INTERNS_ADMIN_USERNAME";
pub const ENV_ADMIN_PASSWORD: &str = "INTERNS_ADMIN_PASSWORD";

const DEFAULT_DB_FILE_NAME: &str = "interns.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyDbPath,
    RelativeLogDir(PathBuf),
    EmptyCredentials,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDbPath => write!(f, "database path cannot be empty"),
            Self::RelativeLogDir(path) => write!(
                f,
                "log directory must be an absolute path, got `{}`",
                path.display()
            ),
            Self::EmptyCredentials => write!(f, "login username and password cannot be empty"),
        }
    }
}

impl Error for ConfigError {}

/// Core configuration resolved at startup.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    db_path: PathBuf,
    log_level: String,
    log_dir: Option<PathBuf>,
    credentials: FixedCredentials,
}

impl CoreConfig {
    /// Creates a validated configuration.
    pub fn new(
        db_path: PathBuf,
        log_level: impl Into<String>,
        log_dir: Option<PathBuf>,
        credentials: FixedCredentials,
    ) -> Result<Self, ConfigError> {
        if db_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDbPath);
        }
        if let Some(dir) = log_dir.as_ref() {
            if !dir.is_absolute() {
                return Err(ConfigError::RelativeLogDir(dir.clone()));
            }
        }
        if credentials.is_blank() {
            return Err(ConfigError::EmptyCredentials);
        }

        Ok(Self {
            db_path,
            log_level: log_level.into(),
            log_dir,
            credentials,
        })
    }

    /// Resolves configuration from `INTERNS_*` environment variables.
    ///
    /// Unset or blank variables fall back to defaults: database in the system
    /// temp directory, build-mode log level, no file logging, `admin`/`1234`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = read(ENV_DB_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
        let log_level = read(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string());
        let log_dir = read(ENV_LOG_DIR).map(PathBuf::from);
        let credentials = FixedCredentials::new(
            read(ENV_ADMIN_USERNAME).unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
            read(ENV_ADMIN_PASSWORD).unwrap_or_else(|| DEFAULT_PASSWORD.to_string()),
        );

        Self::new(db_path, log_level, log_dir, credentials)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }

    pub fn credentials(&self) -> &FixedCredentials {
        &self.credentials
    }

    /// Returns a copy pointing at another database file.
    pub fn with_db_path(mut self, db_path: PathBuf) -> Result<Self, ConfigError> {
        if db_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDbPath);
        }
        self.db_path = db_path;
        Ok(self)
    }
}
