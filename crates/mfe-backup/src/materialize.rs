//! # Content Materializer
//!
//! Copies every payload named by a [`FileMapping`] out of the store:
//!
//! ```text
//! files/da/da39a3ee...   ->   <dest>/<filename>
//!                             <dest>/<folder>/<filename>
//! ```
//!
//! Existing destination files are never overwritten, so running twice over
//! the same destination copies only what is new. Every failure here is
//! confined to the record it concerns: it is logged, counted, and the next
//! record is processed.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;

use mfe_core::{FileMapping, FileRecord};
use mfe_store::SourceStore;

use crate::layout::PAYLOAD_DIR;

/// Per-outcome counters for one materialization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterializeReport {
    /// Files written by this pass.
    pub copied: usize,
    /// Records whose destination already existed.
    pub already_present: usize,
    /// Records whose content hash is too short to address a payload.
    pub invalid_hash: usize,
    /// Records whose payload is not in the store.
    pub missing_content: usize,
    /// Records whose destination would leave the output root.
    pub unsafe_destination: usize,
    /// Records that failed on a filesystem operation.
    pub failed: usize,
}

impl MaterializeReport {
    /// Records that were not copied, for any reason.
    pub fn skipped(&self) -> usize {
        self.already_present
            + self.invalid_hash
            + self.missing_content
            + self.unsafe_destination
            + self.failed
    }

    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Copied => self.copied += 1,
            Outcome::AlreadyPresent => self.already_present += 1,
            Outcome::InvalidHash => self.invalid_hash += 1,
            Outcome::MissingContent => self.missing_content += 1,
            Outcome::UnsafeDestination => self.unsafe_destination += 1,
            Outcome::Failed => self.failed += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Copied,
    AlreadyPresent,
    InvalidHash,
    MissingContent,
    UnsafeDestination,
    Failed,
}

/// Copy every record's payload under `destination_root` and return how many
/// files were written. `0` is a normal result.
pub fn materialize<S: SourceStore + ?Sized>(
    store: &S,
    destination_root: &Path,
    mapping: &FileMapping,
) -> usize {
    materialize_with_report(store, destination_root, mapping).copied
}

/// Like [`materialize`], returning counters for every outcome.
pub fn materialize_with_report<S: SourceStore + ?Sized>(
    store: &S,
    destination_root: &Path,
    mapping: &FileMapping,
) -> MaterializeReport {
    let mut report = MaterializeReport::default();
    for record in mapping.records() {
        report.record(copy_record(store, destination_root, record));
    }
    report
}

fn copy_record<S: SourceStore + ?Sized>(
    store: &S,
    destination_root: &Path,
    record: &FileRecord,
) -> Outcome {
    let Some(source_path) = record.content_path(PAYLOAD_DIR) else {
        tracing::warn!(id = %record.id, content_hash = %record.content_hash, "invalid content hash");
        return Outcome::InvalidHash;
    };

    let mut source = match store.open(&source_path) {
        Ok(reader) => reader,
        Err(e) => {
            tracing::warn!(path = %source_path, error = %e, "file not found in source");
            return Outcome::MissingContent;
        }
    };

    let Some(relative) = record.relative_destination() else {
        tracing::warn!(
            id = %record.id,
            folder = %record.folder,
            filename = %record.filename,
            "destination escapes the output folder, skipping"
        );
        return Outcome::UnsafeDestination;
    };
    let destination = destination_root.join(relative);

    match fs::symlink_metadata(&destination) {
        Ok(_) => {
            tracing::info!(path = %destination.display(), "skip (already exists)");
            return Outcome::AlreadyPresent;
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(path = %destination.display(), error = %e, "error checking file");
            return Outcome::Failed;
        }
    }

    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        match fs::metadata(parent) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if let Err(e) = fs::create_dir_all(parent) {
                    tracing::warn!(path = %parent.display(), error = %e, "error creating directory");
                    return Outcome::Failed;
                }
                tracing::info!(path = %parent.display(), "create directory");
            }
            Err(e) => {
                tracing::warn!(path = %parent.display(), error = %e, "error checking directory");
                return Outcome::Failed;
            }
        }
    }

    let mut target = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&destination)
    {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            tracing::info!(path = %destination.display(), "skip (already exists)");
            return Outcome::AlreadyPresent;
        }
        Err(e) => {
            tracing::warn!(path = %destination.display(), error = %e, "error creating file");
            return Outcome::Failed;
        }
    };

    if let Err(e) = io::copy(&mut source, &mut target) {
        tracing::warn!(
            from = %source_path,
            to = %destination.display(),
            error = %e,
            "error copying file"
        );
        drop(target);
        // A truncated file would be skipped as "already exists" next run.
        if let Err(e) = fs::remove_file(&destination) {
            tracing::warn!(path = %destination.display(), error = %e, "error removing partial file");
        }
        return Outcome::Failed;
    }

    tracing::info!(path = %destination.display(), "create file");
    Outcome::Copied
}
