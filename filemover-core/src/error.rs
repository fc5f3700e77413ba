//! Error types for filemover.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur in filemover operations.
#[derive(Error, Debug)]
pub enum FileMoverError {
    /// A config file could not be read or parsed. Callers recover with defaults.
    #[error("Could not load {file}: {reason}")]
    ConfigLoad { file: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid event format: {0}")]
    Validation(String),

    #[error("Calendar credentials are missing or expired: {0}\nRe-authenticate with `filemover auth <provider>`.")]
    Credential(String),

    #[error("Could not extract {}: {reason}", .path.display())]
    Archive { path: PathBuf, reason: String },

    #[error("Access denied: {}. Check that no other application has it open.", .path.display())]
    PermissionDenied { path: PathBuf },

    #[error("File not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Provider not installed: {0}")]
    ProviderNotInstalled(String),

    #[error("Provider request timed out after {0}s")]
    ProviderTimeout(u64),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl FileMoverError {
    /// Classify an IO error raised while working on `path`.
    pub fn from_io(source: io::Error, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        match source.kind() {
            io::ErrorKind::PermissionDenied => FileMoverError::PermissionDenied { path },
            io::ErrorKind::NotFound => FileMoverError::NotFound { path },
            _ => FileMoverError::Io { path, source },
        }
    }

    /// Per-file failures that skip that file but do not abort a batch.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            FileMoverError::PermissionDenied { .. }
                | FileMoverError::NotFound { .. }
                | FileMoverError::Archive { .. }
        )
    }
}

/// Result type alias for filemover operations.
pub type FileMoverResult<T> = Result<T, FileMoverError>;
