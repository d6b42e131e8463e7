//! Error types and exit status for tracklist exports.

use crate::classify::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Exit code for success
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for invocation errors (bad flags, unreadable config)
pub const EXIT_USAGE: i32 = 1;

/// Exit code when the media application is missing or unlaunchable
pub const EXIT_TARGET_UNAVAILABLE: i32 = 2;

/// Exit code when automation permission was not granted
pub const EXIT_PERMISSION_DENIED: i32 = 3;

/// Exit code for any other automation failure
pub const EXIT_AUTOMATION_ERROR: i32 = 4;

/// Exit code when the export file could not be written
pub const EXIT_FILE_WRITE_ERROR: i32 = 5;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("{}: {detail}", kind.explanation())]
    Extraction { kind: ErrorKind, detail: String },

    #[error("Could not write {}: {detail}", path.display())]
    FileWrite { path: PathBuf, detail: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ExportError {
    pub fn exit_code(&self) -> i32 {
        match self {
            ExportError::Extraction { kind, .. } => kind.exit_code(),
            ExportError::FileWrite { .. } => EXIT_FILE_WRITE_ERROR,
            ExportError::Config(_) => EXIT_USAGE,
            ExportError::Csv(_) => EXIT_AUTOMATION_ERROR,
        }
    }

    /// Extraction failure kind, if this error came from the runner
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ExportError::Extraction { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
