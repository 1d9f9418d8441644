//! Names that make up the Moodle backup layout.
//!
//! ```text
//! files.xml
//! files/<hh>/<contenthash>
//! activities/folder_<id>/folder.xml
//! activities/folder_<id>/inforef.xml
//! ```

/// Primary metadata document listing every payload.
pub const FILES_DOCUMENT: &str = "files.xml";

/// Directory holding content-addressed payloads.
pub const PAYLOAD_DIR: &str = "files";

/// Directory holding one sub-directory per course activity.
pub const ACTIVITIES_DIR: &str = "activities";

/// Prefix of activity directories that describe a folder resource.
pub const FOLDER_BUNDLE_PREFIX: &str = "folder_";

/// Per-bundle document carrying the folder name.
pub const FOLDER_DOCUMENT: &str = "folder.xml";

/// Per-bundle document listing the files the activity references.
pub const INFOREF_DOCUMENT: &str = "inforef.xml";
