//! Extraction error types.
//!
//! Only run-level failures become a [`BackupError`]. Per-bundle and
//! per-record problems are logged where they are found and never leave the
//! component that detected them.

use mfe_core::DecodeError;
use mfe_store::StoreError;
use thiserror::Error;

/// Errors that abort an extraction run.
#[derive(Debug, Error)]
pub enum BackupError {
    /// The primary metadata document could not be opened.
    #[error("error reading {path}: {source}")]
    MetadataNotFound { path: String, source: StoreError },

    /// The primary metadata document is not valid XML of the expected shape.
    #[error("error parsing {path}: {source}")]
    MetadataDecode { path: String, source: DecodeError },

    /// The activities directory could not be listed.
    #[error("error reading activities folder {path}: {source}")]
    ActivitiesUnreadable { path: String, source: StoreError },
}

/// Result type alias for extraction operations.
pub type BackupResult<T> = Result<T, BackupError>;
