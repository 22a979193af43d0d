//! Error types for the flockfill letter personalization engine.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading pools, rosters, project metadata and templates.
///
/// Every variant except the plumbing ones is fatal for the batch being built;
/// callers are expected to surface the message to the user unmodified.
#[derive(Debug, Error)]
pub enum FillError {
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error(
        "Unrecognized encoding in {}; please save the file as UTF-8 \
         (the default on macOS and Linux). On Windows, paste the table into a \
         spreadsheet tool and download it again as CSV.\n{detail}",
        path.display()
    )]
    Encoding { path: PathBuf, detail: String },

    #[error("'{column}' not found in {}; check the table header again: {headers:?}", path.display())]
    MissingColumn {
        column: String,
        path: PathBuf,
        headers: Vec<String>,
    },

    #[error("Unknown {column} value '{value}' for {first_name} {last_name}")]
    InvalidValue {
        first_name: String,
        last_name: String,
        column: String,
        value: String,
    },

    #[error("Unrecognized tag type in '{0}' (expected a prefix of atom_, word_, sent_ or para_)")]
    UnknownTag(String),

    #[error("Unknown wrap kind: {0}")]
    UnknownWrapKind(String),

    #[error("No entries found in {}", path.display())]
    EmptyChoices { path: PathBuf },

    #[error("Unresolved slots in letter for {recipient}: {}", slots.join(", "))]
    UnresolvedSlots {
        recipient: String,
        slots: Vec<String>,
    },

    #[error("Roster parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for FillError {
    fn from(err: config::ConfigError) -> Self {
        FillError::ConfigError(err.to_string())
    }
}

/// Read a UTF-8 text file, mapping a missing file to [`FillError::NotFound`].
pub(crate) fn read_text(path: &std::path::Path) -> Result<String, FillError> {
    if !path.is_file() {
        return Err(FillError::NotFound {
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::InvalidData => FillError::Encoding {
            path: path.to_path_buf(),
            detail: e.to_string(),
        },
        _ => FillError::Io(e),
    })
}
