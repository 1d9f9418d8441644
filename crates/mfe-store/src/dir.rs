//! Directory-backed store for a backup that was already unpacked.

use std::fs;
use std::io::{BufReader, Read};
use std::path::PathBuf;

use crate::error::{StoreError, StoreResult};
use crate::path::segments;
use crate::{EntryKind, SourceStore, StoreEntry};

/// A [`SourceStore`] rooted at a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Create a store rooted at `root`. The directory is not checked until
    /// the first read.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> StoreResult<PathBuf> {
        let mut full = self.root.clone();
        full.extend(segments(path)?);
        Ok(full)
    }
}

fn map_io(path: &str, e: std::io::Error) -> StoreError {
    if e.kind() == std::io::ErrorKind::NotFound {
        StoreError::NotFound {
            path: path.to_string(),
        }
    } else {
        StoreError::Io(e)
    }
}

impl SourceStore for DirStore {
    fn open(&self, path: &str) -> StoreResult<Box<dyn Read + '_>> {
        let full = self.resolve(path)?;
        let meta = fs::metadata(&full).map_err(|e| map_io(path, e))?;
        if meta.is_dir() {
            return Err(StoreError::IsADirectory {
                path: path.to_string(),
            });
        }
        let file = fs::File::open(&full).map_err(|e| map_io(path, e))?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn read_dir(&self, path: &str) -> StoreResult<Vec<StoreEntry>> {
        let full = self.resolve(path)?;
        let meta = fs::metadata(&full).map_err(|e| map_io(path, e))?;
        if !meta.is_dir() {
            return Err(StoreError::NotADirectory {
                path: path.to_string(),
            });
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(&full)? {
            let entry = entry?;
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    tracing::warn!(name = ?raw, dir = %path, "skipping entry with non-UTF-8 name");
                    continue;
                }
            };
            // Follow symlinks so a linked activity directory still counts.
            let kind = if entry.path().is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            entries.push(StoreEntry::new(name, kind));
        }
        entries.sort();
        Ok(entries)
    }
}
