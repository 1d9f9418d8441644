//! # Archive-Backed Store
//!
//! A `.mbz` backup is a gzip-compressed tar. A gzip stream cannot be seeked,
//! so the archive is read once, front to back, and every regular file is
//! kept in memory together with a directory index. Afterwards the store
//! answers `open` and `read_dir` without touching the archive again.
//!
//! ## Entry Normalization
//!
//! - Leading `./` and `/` are stripped (`./files.xml` → `files.xml`).
//! - Entries with a `..` segment are skipped.
//! - Only regular files and directories are indexed. Symlinks, hard links
//!   and device nodes are skipped.
//! - Parent directories implied by a file path are synthesized, since many
//!   archivers omit explicit directory entries.
//! - A path that appears twice keeps the later entry.
//! - An entry whose data ends before the size its header declares fails the
//!   whole archive.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufReader, Cursor, Read};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::{StoreError, StoreResult};
use crate::path::segments;
use crate::{EntryKind, SourceStore, StoreEntry};

/// Upper bound on the buffer reserved up front for one entry. The size in a
/// tar header is not trusted beyond this; larger entries grow as they are read.
const MAX_PREALLOCATION: u64 = 1 << 20;

/// A [`SourceStore`] over the decoded contents of a `.tar.gz` archive.
#[derive(Debug, Clone, Default)]
pub struct TarGzStore {
    files: BTreeMap<String, Vec<u8>>,
    /// Directory path (`""` for the root) to its children.
    dirs: BTreeMap<String, BTreeMap<String, EntryKind>>,
}

impl TarGzStore {
    /// Open and index the archive at `path`.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let file = File::open(path).map_err(|e| StoreError::Archive {
            path: path.to_path_buf(),
            source: e,
        })?;
        let store = Self::from_reader(BufReader::new(file)).map_err(|e| StoreError::Archive {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::debug!(
            archive = %path.display(),
            files = store.file_count(),
            dirs = store.dirs.len(),
            "indexed archive"
        );
        Ok(store)
    }

    /// Index a gzip-compressed tar stream.
    pub fn from_reader(reader: impl Read) -> io::Result<Self> {
        let mut archive = tar::Archive::new(GzDecoder::new(reader));
        let mut store = Self::default();
        store.dirs.insert(String::new(), BTreeMap::new());

        for entry in archive.entries()? {
            let mut entry = entry?;
            let raw = entry.path()?.to_string_lossy().into_owned();
            let Some(key) = normalize(&raw) else {
                if raw.split('/').any(|s| s == "..") {
                    tracing::warn!(entry = %raw, "skipping archive entry outside the backup root");
                }
                continue;
            };

            let kind = entry.header().entry_type();
            if kind.is_dir() {
                store.insert_dir(&key);
            } else if kind.is_file() {
                let declared = entry.size();
                let mut content = Vec::with_capacity(declared.min(MAX_PREALLOCATION) as usize);
                entry.read_to_end(&mut content)?;
                if content.len() as u64 != declared {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        format!(
                            "archive entry {raw} is truncated: header declares {declared} bytes, found {}",
                            content.len()
                        ),
                    ));
                }
                store.insert_file(key, content);
            } else {
                tracing::debug!(entry = %raw, kind = ?kind, "skipping non-regular archive entry");
            }
        }
        Ok(store)
    }

    /// Number of regular files in the archive.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    fn insert_dir(&mut self, path: &str) {
        if path.is_empty() {
            self.dirs.entry(String::new()).or_default();
            return;
        }
        if self.dirs.contains_key(path) {
            return;
        }
        self.dirs.insert(path.to_string(), BTreeMap::new());
        let (parent, name) = split_parent(path);
        self.insert_dir(parent);
        if let Some(children) = self.dirs.get_mut(parent) {
            children.insert(name.to_string(), EntryKind::Directory);
        }
    }

    fn insert_file(&mut self, path: String, content: Vec<u8>) {
        let (parent, name) = split_parent(&path);
        self.insert_dir(parent);
        if let Some(children) = self.dirs.get_mut(parent) {
            children.insert(name.to_string(), EntryKind::File);
        }
        self.files.insert(path, content);
    }
}

/// Turn a raw tar entry name into a store key. Returns `None` for the root
/// itself and for names that escape it.
fn normalize(raw: &str) -> Option<String> {
    let mut parts = Vec::new();
    for segment in raw.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            s => parts.push(s),
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

fn split_parent(path: &str) -> (&str, &str) {
    match path.rsplit_once('/') {
        Some((parent, name)) => (parent, name),
        None => ("", path),
    }
}

fn key_for(path: &str) -> StoreResult<String> {
    Ok(segments(path)?.join("/"))
}

impl SourceStore for TarGzStore {
    fn open(&self, path: &str) -> StoreResult<Box<dyn Read + '_>> {
        let key = key_for(path)?;
        if let Some(content) = self.files.get(&key) {
            return Ok(Box::new(Cursor::new(content.as_slice())));
        }
        if self.dirs.contains_key(&key) {
            return Err(StoreError::IsADirectory {
                path: path.to_string(),
            });
        }
        Err(StoreError::NotFound {
            path: path.to_string(),
        })
    }

    fn read_dir(&self, path: &str) -> StoreResult<Vec<StoreEntry>> {
        let key = key_for(path)?;
        match self.dirs.get(&key) {
            Some(children) => Ok(children
                .iter()
                .map(|(name, kind)| StoreEntry::new(name.clone(), *kind))
                .collect()),
            None if self.files.contains_key(&key) => Err(StoreError::NotADirectory {
                path: path.to_string(),
            }),
            None => Err(StoreError::NotFound {
                path: path.to_string(),
            }),
        }
    }
}
