//! End-to-end extraction over one source store.

use std::path::Path;

use mfe_store::SourceStore;

use crate::error::BackupResult;
use crate::folders::{resolve_folders, ResolveReport};
use crate::layout::{ACTIVITIES_DIR, FILES_DOCUMENT};
use crate::mapping::build_mapping;
use crate::materialize::{materialize_with_report, MaterializeReport};

/// Outcome of a full extraction run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractReport {
    /// Records in the mapping built from `files.xml`.
    pub mapped: usize,
    pub resolve: ResolveReport,
    pub materialize: MaterializeReport,
}

impl ExtractReport {
    /// Files written to the destination by this run.
    pub fn copied(&self) -> usize {
        self.materialize.copied
    }
}

/// Build the mapping, resolve folders, then copy payloads into
/// `destination`, in that order.
///
/// Returns an error only for run-level failures (see [`crate::BackupError`]).
/// In that case nothing has been written.
pub fn extract<S: SourceStore + ?Sized>(
    store: &S,
    destination: &Path,
) -> BackupResult<ExtractReport> {
    let mut mapping = build_mapping(store, FILES_DOCUMENT)?;
    let resolve = resolve_folders(store, ACTIVITIES_DIR, &mut mapping)?;
    let materialize = materialize_with_report(store, destination, &mapping);

    let report = ExtractReport {
        mapped: mapping.len(),
        resolve,
        materialize,
    };
    tracing::info!(
        mapped = report.mapped,
        copied = report.materialize.copied,
        skipped = report.materialize.skipped(),
        "extraction finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BackupError;
    use mfe_store::DirStore;
    use std::fs;

    const EMPTY_SHA1: &str = "da39a3ee5e6b4b0d3255bfef95601890afd80709";

    fn backup() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join("files.xml"),
            format!(
                r#"<files>
                  <file id="1"><contenthash>{EMPTY_SHA1}</contenthash><filename>a/b.txt</filename></file>
                  <file id="2"><contenthash>{EMPTY_SHA1}</contenthash><filename>.</filename></file>
                  <file id="3"><contenthash>x</contenthash><filename>bad.txt</filename></file>
                </files>"#
            ),
        )
        .unwrap();
        fs::create_dir_all(root.join("files").join("da")).unwrap();
        fs::write(root.join("files").join("da").join(EMPTY_SHA1), b"").unwrap();
        let bundle = root.join("activities").join("folder_5");
        fs::create_dir_all(&bundle).unwrap();
        fs::write(
            bundle.join("folder.xml"),
            "<activity><folder><name>My:Folder</name></folder></activity>",
        )
        .unwrap();
        fs::write(
            bundle.join("inforef.xml"),
            "<inforef><fileref><file><id>1</id></file></fileref></inforef>",
        )
        .unwrap();
        dir
    }

    #[test]
    fn extracts_into_resolved_folder() {
        let src = backup();
        let out = tempfile::tempdir().unwrap();
        let store = DirStore::new(src.path());

        let report = extract(&store, out.path()).unwrap();

        assert_eq!(report.mapped, 2);
        assert_eq!(report.copied(), 1);
        assert_eq!(report.resolve.assigned, 1);
        assert_eq!(report.materialize.invalid_hash, 1);
        assert!(out.path().join("MyFolder").join("ab.txt").is_file());
    }

    #[test]
    fn rerun_is_idempotent() {
        let src = backup();
        let out = tempfile::tempdir().unwrap();
        let store = DirStore::new(src.path());

        assert_eq!(extract(&store, out.path()).unwrap().copied(), 1);
        let second = extract(&store, out.path()).unwrap();
        assert_eq!(second.copied(), 0);
        assert_eq!(second.materialize.already_present, 1);
    }

    #[test]
    fn missing_files_xml_writes_nothing() {
        let src = backup();
        fs::remove_file(src.path().join("files.xml")).unwrap();
        let out = tempfile::tempdir().unwrap();
        let store = DirStore::new(src.path());

        let err = extract(&store, out.path()).unwrap_err();

        assert!(matches!(err, BackupError::MetadataNotFound { .. }));
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
    }

    #[test]
    fn missing_activities_is_fatal() {
        let src = backup();
        fs::remove_dir_all(src.path().join("activities")).unwrap();
        let out = tempfile::tempdir().unwrap();
        let store = DirStore::new(src.path());

        let err = extract(&store, out.path()).unwrap_err();

        assert!(matches!(err, BackupError::ActivitiesUnreadable { .. }));
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
    }
}
