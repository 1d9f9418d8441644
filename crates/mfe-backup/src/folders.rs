//! # Folder Resolver
//!
//! Files that belong to a Moodle "folder" resource are listed in the
//! resource's activity bundle, `activities/folder_<n>/`:
//!
//! ```xml
//! <!-- folder.xml -->
//! <activity id="5" moduleid="12" modulename="folder" contextid="40">
//!   <folder id="5">
//!     <name>Week 1 slides</name>
//!     ...
//!   </folder>
//! </activity>
//!
//! <!-- inforef.xml -->
//! <inforef>
//!   <fileref>
//!     <file><id>70829635</id></file>
//!     ...
//!   </fileref>
//! </inforef>
//! ```
//!
//! Only directories named `folder_*` are bundles; other entries under
//! `activities/` are ignored. Each referenced record gets the bundle's
//! sanitized folder name. Bundles are visited in name order and are
//! independent of each other: a bundle with a missing or malformed document
//! is skipped with a warning.
//!
//! ## Conflicts
//!
//! If two bundles reference the same id, the bundle visited last wins. The
//! replacement is logged as a warning naming both folders and counted in
//! [`ResolveReport::conflicts`].

use mfe_core::{decode, sanitize, FileMapping};
use mfe_store::{path, SourceStore};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{BackupError, BackupResult};
use crate::layout::{FOLDER_BUNDLE_PREFIX, FOLDER_DOCUMENT, INFOREF_DOCUMENT};

#[derive(Debug, Default, Deserialize)]
struct FolderDocument {
    #[serde(default)]
    folder: FolderElement,
}

#[derive(Debug, Default, Deserialize)]
struct FolderElement {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct InforefDocument {
    #[serde(default)]
    fileref: Vec<FileRefGroup>,
}

#[derive(Debug, Default, Deserialize)]
struct FileRefGroup {
    #[serde(rename = "file", default)]
    files: Vec<FileRef>,
}

#[derive(Debug, Default, Deserialize)]
struct FileRef {
    #[serde(default)]
    id: String,
}

impl InforefDocument {
    fn ids(self) -> Vec<String> {
        self.fileref
            .into_iter()
            .flat_map(|group| group.files)
            .map(|file| file.id)
            .collect()
    }
}

/// Counters describing one resolver pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveReport {
    /// Bundles whose documents were both read.
    pub bundles: usize,
    /// Bundles skipped because a document was missing or malformed.
    pub skipped_bundles: usize,
    /// Folder assignments made.
    pub assigned: usize,
    /// References to ids absent from the mapping.
    pub dangling: usize,
    /// Assignments that replaced a different folder set by an earlier bundle.
    pub conflicts: usize,
}

/// Annotate `mapping` with folder names from every `folder_*` bundle under
/// `activities_path`.
///
/// Fails only if `activities_path` itself cannot be listed.
pub fn resolve_folders<S: SourceStore + ?Sized>(
    store: &S,
    activities_path: &str,
    mapping: &mut FileMapping,
) -> BackupResult<ResolveReport> {
    let entries = store
        .read_dir(activities_path)
        .map_err(|e| BackupError::ActivitiesUnreadable {
            path: activities_path.to_string(),
            source: e,
        })?;

    let mut report = ResolveReport::default();
    for entry in entries {
        if !entry.is_dir() || !entry.name.starts_with(FOLDER_BUNDLE_PREFIX) {
            continue;
        }
        let bundle = path::join(activities_path, &entry.name);
        match read_bundle(store, &bundle) {
            Some((folder, ids)) => {
                report.bundles += 1;
                assign(mapping, &folder, ids, &mut report);
            }
            None => report.skipped_bundles += 1,
        }
    }

    tracing::debug!(
        bundles = report.bundles,
        skipped = report.skipped_bundles,
        assigned = report.assigned,
        dangling = report.dangling,
        "resolved folders"
    );
    Ok(report)
}

/// Read the folder name and referenced ids of one bundle, or `None` if the
/// bundle has to be skipped.
fn read_bundle<S: SourceStore + ?Sized>(
    store: &S,
    bundle: &str,
) -> Option<(String, Vec<String>)> {
    let folder: FolderDocument = read_document(store, bundle, FOLDER_DOCUMENT)?;
    let inforef: InforefDocument = read_document(store, bundle, INFOREF_DOCUMENT)?;
    Some((sanitize(&folder.folder.name), inforef.ids()))
}

fn read_document<S: SourceStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    bundle: &str,
    name: &str,
) -> Option<T> {
    let doc_path = path::join(bundle, name);
    let reader = match store.open(&doc_path) {
        Ok(reader) => reader,
        Err(e) => {
            tracing::warn!(bundle = %bundle, error = %e, "{name} not found, skipping bundle");
            return None;
        }
    };
    match decode(reader) {
        Ok(document) => Some(document),
        Err(e) => {
            tracing::warn!(bundle = %bundle, error = %e, "error parsing {name}, skipping bundle");
            None
        }
    }
}

fn assign(
    mapping: &mut FileMapping,
    folder: &str,
    ids: impl IntoIterator<Item = String>,
    report: &mut ResolveReport,
) {
    for id in ids {
        let Some(record) = mapping.get_mut(&id) else {
            tracing::warn!(id = %id, folder = %folder, "file id not found in mapping");
            report.dangling += 1;
            continue;
        };
        if !record.folder.is_empty() && record.folder != folder {
            tracing::warn!(
                id = %id,
                previous = %record.folder,
                folder = %folder,
                "file referenced by more than one folder, keeping the latest"
            );
            report.conflicts += 1;
        }
        record.folder = folder.to_string();
        report.assigned += 1;
        tracing::debug!(id = %id, folder = %folder, "assigned folder to file");
    }
}
