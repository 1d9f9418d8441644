//! # mfe-store — Read-Only Source Stores
//!
//! A Moodle backup reaches the extractor in one of two forms: the `.mbz`
//! file itself (a gzip-compressed tar) or a directory it was already
//! unpacked into. Both are exposed through the [`SourceStore`] trait so the
//! extraction pipeline never needs to know which one it holds.
//!
//! ## Paths
//!
//! Store paths are slash-separated and relative to the backup root
//! (`files.xml`, `activities/folder_12/inforef.xml`). `.` names the root.
//! Empty, `.` and `..` segments are rejected with
//! [`StoreError::InvalidPath`]; a store never reads outside its root.
//!
//! ## Opening a Source
//!
//! [`open_source`] inspects a filesystem path and returns the matching
//! store: [`DirStore`] for a directory, [`TarGzStore`] for a file ending in
//! `.mbz`, `.tar.gz` or `.tgz`.

pub mod dir;
pub mod error;
pub mod path;
pub mod source;
pub mod targz;

use std::io::Read;

pub use dir::DirStore;
pub use error::{StoreError, StoreResult};
pub use source::{open_source, ARCHIVE_SUFFIXES};
pub use targz::TarGzStore;

/// Kind of an entry returned by [`SourceStore::read_dir`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntryKind {
    File,
    Directory,
}

/// One entry directly under a listed directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoreEntry {
    /// Entry name, without any directory component.
    pub name: String,
    pub kind: EntryKind,
}

impl StoreEntry {
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// A read-only hierarchical byte store.
///
/// Readers returned by [`open`](SourceStore::open) borrow the store and are
/// released when dropped.
pub trait SourceStore {
    /// Open the file at `path` for reading.
    fn open(&self, path: &str) -> StoreResult<Box<dyn Read + '_>>;

    /// List the entries directly under the directory at `path`, sorted by
    /// name.
    fn read_dir(&self, path: &str) -> StoreResult<Vec<StoreEntry>>;
}
