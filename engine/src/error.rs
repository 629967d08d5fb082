//! Error types for the reconciliation engine.
//!
//! `EngineError` represents run-level failures. Configuration and directory
//! errors abort a run before anything is moved. Per-file relocation failures
//! are recorded on `MoveRecord` and only surface here as a final
//! `RelocationIncomplete` once every file has been attempted.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while configuring or executing a run.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A configuration value is missing or malformed
    #[error("Invalid configuration for '{key}': {reason}")]
    Configuration { key: String, reason: String },

    /// A directory could not be read (missing, permissions)
    #[error("Cannot access directory {}: {source}", .path.display())]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A path expected to be a directory is something else
    #[error("Not a directory: {}", .path.display())]
    NotADirectory { path: PathBuf },

    /// A single file operation failed (size query, delete, move)
    #[error("Failed to {operation} {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        operation: &'static str,
        #[source]
        source: io::Error,
    },

    /// A file with the same name already exists at the destination
    #[error("Destination already contains {}", .path.display())]
    DestinationConflict { path: PathBuf },

    /// Some files of the net list could not be relocated
    #[error("{failed} of {attempted} files could not be moved")]
    RelocationIncomplete { failed: usize, attempted: usize },
}

impl EngineError {
    /// Extract the OS error code from this error, if available.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            Self::DirectoryAccess { source, .. } | Self::FileAccess { source, .. } => {
                source.raw_os_error()
            }
            _ => None,
        }
    }

    /// True when the run never started because of bad configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    pub(crate) fn config(key: &str, reason: impl Into<String>) -> Self {
        Self::Configuration {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}
