//! Store error handling
//!
//! Typed errors for the bookmark file and URL parsing, with path context
//! and I/O error classification.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or appending to the bookmark file
#[derive(Error, Debug)]
pub enum StoreError {
    /// Permission denied accessing the bookmark file
    #[error("Permission denied: cannot access '{path}'. Check file permissions.")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Disk is full or quota exceeded
    #[error("Disk full or quota exceeded while writing to '{path}'. Free up disk space and try again.")]
    DiskFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to read the bookmark file
    #[error("reading bookmark db '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to open the bookmark file for appending
    #[error("opening bookmark db '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write or close the bookmark file
    #[error("adding bookmark to '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// URL is already stored
    #[error("duplicate: {url}")]
    Duplicate { url: String },
}

/// Which step of file access failed, used to pick the fallback variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoStage {
    Read,
    Open,
    Write,
}

impl StoreError {
    /// Create an error from an I/O error with path context
    ///
    /// Classifies the error based on its kind (permission, disk full), then
    /// falls back to the variant for the failing stage.
    pub fn from_io(error: io::Error, path: PathBuf, stage: IoStage) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => StoreError::PermissionDenied {
                path,
                source: error,
            },
            _ if is_disk_full_error(&error) => StoreError::DiskFull {
                path,
                source: error,
            },
            _ => match stage {
                IoStage::Read => StoreError::Read {
                    path,
                    source: error,
                },
                IoStage::Open => StoreError::Open {
                    path,
                    source: error,
                },
                IoStage::Write => StoreError::Write {
                    path,
                    source: error,
                },
            },
        }
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            StoreError::DiskFull { .. } => Some("Free up disk space and try again."),
            StoreError::PermissionDenied { .. } => {
                Some("Check the permissions of the bookmark file and its directory.")
            }
            StoreError::Duplicate { .. } => Some("List saved bookmarks with `bookmark -list`."),
            _ => None,
        }
    }
}

/// Check if an I/O error indicates disk full condition
fn is_disk_full_error(error: &io::Error) -> bool {
    let msg = error.to_string().to_lowercase();
    msg.contains("no space left")
        || msg.contains("disk full")
        || msg.contains("quota exceeded")
        || msg.contains("not enough space")
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Input could not be parsed as an absolute URL
#[derive(Error, Debug)]
#[error("parsing URL: {input}")]
pub struct ParseUrlError {
    pub input: String,
    #[source]
    pub source: url::ParseError,
}
