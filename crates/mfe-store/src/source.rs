//! Choosing a store for a source path.

use std::path::Path;

use crate::error::{StoreError, StoreResult};
use crate::{DirStore, SourceStore, TarGzStore};

/// File name suffixes recognized as gzip-compressed tar backups.
pub const ARCHIVE_SUFFIXES: &[&str] = &[".mbz", ".tar.gz", ".tgz"];

fn is_archive_name(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .is_some_and(|name| ARCHIVE_SUFFIXES.iter().any(|s| name.ends_with(s)))
}

/// Open `path` as a backup source.
///
/// - a directory becomes a [`DirStore`],
/// - a file named `*.mbz`, `*.tar.gz` or `*.tgz` is decompressed and indexed
///   as a [`TarGzStore`],
/// - anything else is [`StoreError::UnsupportedSource`].
pub fn open_source(path: &Path) -> StoreResult<Box<dyn SourceStore>> {
    let meta = std::fs::metadata(path).map_err(|e| StoreError::SourceNotFound {
        path: path.to_path_buf(),
        source: e,
    })?;

    if meta.is_dir() {
        tracing::debug!(source = %path.display(), "using extracted backup directory");
        return Ok(Box::new(DirStore::new(path)));
    }
    if meta.is_file() && is_archive_name(path) {
        tracing::debug!(source = %path.display(), "reading backup archive");
        return Ok(Box::new(TarGzStore::open(path)?));
    }

    Err(StoreError::UnsupportedSource {
        path: path.to_path_buf(),
    })
}
