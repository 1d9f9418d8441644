//! # File Records and the Id Mapping
//!
//! A [`FileRecord`] is one `<file>` entry of the backup's `files.xml`:
//!
//! ```xml
//! <files>
//!   <file id="70829635">
//!     <contenthash>da39a3ee5e6b4b0d3255bfef95601890afd80709</contenthash>
//!     <filename>empty.txt</filename>
//!     ...
//!   </file>
//! </files>
//! ```
//!
//! The `folder` field never appears in the document. It is filled in later
//! from the per-activity cross references.
//!
//! A [`FileMapping`] keys records by id. It is built once, mutated in place
//! while folders are resolved, then only read while payloads are copied.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// The filename Moodle records for directory entries. Such records carry no
/// payload worth extracting.
pub const CURRENT_DIR_PLACEHOLDER: &str = ".";

/// One payload entry referenced by the backup metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FileRecord {
    /// Opaque identifier assigned by `files.xml`.
    #[serde(rename = "@id", default)]
    pub id: String,
    /// Content-addressing key; the payload lives at `files/<hh>/<hash>`.
    #[serde(rename = "contenthash", default)]
    pub content_hash: String,
    /// Display filename. Sanitized by the mapping builder.
    #[serde(default)]
    pub filename: String,
    /// Destination sub-folder, empty for the destination root.
    #[serde(skip)]
    pub folder: String,
}

impl FileRecord {
    /// Construct a record with no folder assigned.
    pub fn new(
        id: impl Into<String>,
        content_hash: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            content_hash: content_hash.into(),
            filename: filename.into(),
            folder: String::new(),
        }
    }

    /// The first two characters of the content hash, or `None` when the hash
    /// is too short to address a payload.
    pub fn hash_prefix(&self) -> Option<&str> {
        let mut chars = self.content_hash.char_indices();
        match (chars.next(), chars.next()) {
            (Some(_), Some((i, c))) => Some(&self.content_hash[..i + c.len_utf8()]),
            _ => None,
        }
    }

    /// Store path of the payload under `payload_dir`:
    /// `<payload_dir>/<first-2-chars>/<full-hash>`.
    pub fn content_path(&self, payload_dir: &str) -> Option<String> {
        let prefix = self.hash_prefix()?;
        Some(format!("{payload_dir}/{prefix}/{}", self.content_hash))
    }

    /// Destination path relative to the output root: `filename` or
    /// `folder/filename`.
    ///
    /// Returns `None` if either component is `..`, which would place the
    /// file outside the output root.
    pub fn relative_destination(&self) -> Option<PathBuf> {
        if self.filename == ".." || self.folder == ".." {
            return None;
        }
        if self.folder.is_empty() {
            Some(PathBuf::from(&self.filename))
        } else {
            Some(Path::new(&self.folder).join(&self.filename))
        }
    }
}

/// Identifier to [`FileRecord`] mapping.
///
/// Iteration follows id order so that runs over the same backup log and copy
/// in the same sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMapping {
    records: BTreeMap<String, FileRecord>,
}

impl FileMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `record` under its own id, returning the record it replaced.
    pub fn insert(&mut self, record: FileRecord) -> Option<FileRecord> {
        self.records.insert(record.id.clone(), record)
    }

    pub fn get(&self, id: &str) -> Option<&FileRecord> {
        self.records.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut FileRecord> {
        self.records.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate `(id, record)` pairs in id order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, FileRecord> {
        self.records.iter()
    }

    /// Iterate records in id order.
    pub fn records(&self) -> btree_map::Values<'_, String, FileRecord> {
        self.records.values()
    }
}

impl<'a> IntoIterator for &'a FileMapping {
    type Item = (&'a String, &'a FileRecord);
    type IntoIter = btree_map::Iter<'a, String, FileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<FileRecord> for FileMapping {
    fn from_iter<I: IntoIterator<Item = FileRecord>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for record in iter {
            mapping.insert(record);
        }
        mapping
    }
}
