//! Store-specific error types.
//!
//! Errors carry the store path or filesystem path they concern so that a
//! warning about one missing payload can be traced back to the backup.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while opening or reading a source store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No entry exists at the store path.
    #[error("not found in source: {path}")]
    NotFound { path: String },

    /// The store path is absolute, empty, or contains `.`/`..` segments.
    #[error("invalid store path {path:?}")]
    InvalidPath { path: String },

    /// A directory was listed but the entry is a file.
    #[error("not a directory: {path}")]
    NotADirectory { path: String },

    /// A file was opened but the entry is a directory.
    #[error("is a directory: {path}")]
    IsADirectory { path: String },

    /// The source path given on the command line does not exist.
    #[error("error checking source path {path}: {source}")]
    SourceNotFound {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The source path is neither a directory nor a recognized archive.
    #[error("unsupported source {path}: only a folder or a .mbz file is supported")]
    UnsupportedSource { path: PathBuf },

    /// The archive could not be decompressed or its tar stream is corrupt.
    #[error("failed to read archive {path}: {source}")]
    Archive {
        path: PathBuf,
        source: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Returns `true` for errors that mean "nothing at this path".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
