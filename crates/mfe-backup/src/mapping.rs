//! # Primary Mapping Builder
//!
//! Turns `files.xml` into a [`FileMapping`]. The document looks like:
//!
//! ```xml
//! <files>
//!   <file id="70829635">
//!     <contenthash>da39a3ee5e6b4b0d3255bfef95601890afd80709</contenthash>
//!     <filename>empty.txt</filename>
//!     ...
//!   </file>
//!   ...
//! </files>
//! ```
//!
//! Filenames are sanitized as they are read. Entries with no id, no content
//! hash, or a filename that is `.` (Moodle's directory marker) or empty
//! after sanitizing are dropped. When an id appears twice the later entry
//! wins.

use mfe_core::{decode, sanitize, FileMapping, FileRecord, CURRENT_DIR_PLACEHOLDER};
use mfe_store::SourceStore;
use serde::Deserialize;

use crate::error::{BackupError, BackupResult};

#[derive(Debug, Default, Deserialize)]
struct FilesDocument {
    #[serde(rename = "file", default)]
    files: Vec<FileRecord>,
}

/// Read the document at `path` and build the id mapping from it.
///
/// Fails only if the document cannot be opened or decoded. Individual
/// entries that do not qualify are skipped without error.
pub fn build_mapping<S: SourceStore + ?Sized>(store: &S, path: &str) -> BackupResult<FileMapping> {
    let reader = store.open(path).map_err(|e| BackupError::MetadataNotFound {
        path: path.to_string(),
        source: e,
    })?;
    let document: FilesDocument = decode(reader).map_err(|e| BackupError::MetadataDecode {
        path: path.to_string(),
        source: e,
    })?;

    let total = document.files.len();
    let mapping = mapping_from_entries(document.files);
    tracing::debug!(entries = total, mapped = mapping.len(), "built file mapping");
    Ok(mapping)
}

/// Sanitize and filter decoded entries into a mapping.
pub fn mapping_from_entries(entries: impl IntoIterator<Item = FileRecord>) -> FileMapping {
    let mut mapping = FileMapping::new();
    for mut record in entries {
        record.filename = sanitize(&record.filename);
        if record.id.is_empty()
            || record.content_hash.is_empty()
            || record.filename.is_empty()
            || record.filename == CURRENT_DIR_PLACEHOLDER
        {
            tracing::trace!(id = %record.id, filename = %record.filename, "skipping file entry");
            continue;
        }
        tracing::debug!(
            id = %record.id,
            content_hash = %record.content_hash,
            filename = %record.filename,
            "added file to mapping"
        );
        mapping.insert(record);
    }
    mapping
}
