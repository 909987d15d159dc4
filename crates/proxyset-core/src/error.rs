//! Error types for target operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while detecting, applying, or removing proxy settings.
#[derive(Debug, Error)]
pub enum TargetError {
    /// Failed to read a configuration file.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a configuration file.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create a directory.
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to delete a file.
    #[error("failed to delete {path}: {source}")]
    Delete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create a permission-sensitive file with its required mode.
    #[error("failed to create {path} with mode {mode:03o}: {source}")]
    SecureCreate {
        path: PathBuf,
        mode: u32,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for target operations.
pub type Result<T> = std::result::Result<T, TargetError>;
