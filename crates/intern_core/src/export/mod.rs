//! Export renderers for intern lists.
//!
//! # Responsibility
//! - Render CSV lines and a tabular document from a record slice.
//! - Write rendered output to the path handed to a share sink.
//!
//! # Invariants
//! - Renderers are pure and keep the input order.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub mod csv;
pub mod table;

pub use self::csv::render_csv;
pub use self::table::render_table;

#[derive(Debug)]
pub enum ExportError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to write export `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Writes rendered export contents, replacing any existing file.
pub fn write_export(path: impl AsRef<Path>, contents: &str) -> Result<(), ExportError> {
    let path = path.as_ref();
    std::fs::write(path, contents).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!(
        "event=export_write module=export status=ok bytes={}",
        contents.len()
    );
    Ok(())
}
