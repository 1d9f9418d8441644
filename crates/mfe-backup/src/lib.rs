//! # mfe-backup — Backup Extraction Engine
//!
//! Rebuilds the original file and folder layout of a Moodle course backup.
//! Payloads in a backup are stored by content hash under
//! `files/<hh>/<hash>`; their names and folders live in metadata documents.
//!
//! The engine runs three passes over one [`SourceStore`](mfe_store::SourceStore),
//! strictly in sequence:
//!
//! 1. [`mapping::build_mapping`] decodes `files.xml` into a
//!    [`FileMapping`](mfe_core::FileMapping).
//! 2. [`folders::resolve_folders`] walks `activities/folder_*` bundles and
//!    writes each bundle's folder name onto the records it references.
//! 3. [`materialize::materialize`] copies every payload to
//!    `dest/<filename>` or `dest/<folder>/<filename>`, skipping files that
//!    already exist.
//!
//! [`extract::extract`] chains the three.
//!
//! ## Failure Policy
//!
//! Only document-level failures are errors: `files.xml` missing or
//! malformed, or the activities directory unreadable. Everything that
//! concerns a single bundle or a single record is logged with `tracing`
//! and skipped, and the run continues.

pub mod error;
pub mod extract;
pub mod folders;
pub mod layout;
pub mod mapping;
pub mod materialize;

pub use error::{BackupError, BackupResult};
pub use extract::{extract, ExtractReport};
pub use folders::{resolve_folders, ResolveReport};
pub use mapping::build_mapping;
pub use materialize::{materialize, materialize_with_report, MaterializeReport};
