//! # mfe-cli — Moodle File Extractor
//!
//! Provides the `mfe` command:
//!
//! ```bash
//! mfe backup-moodle2-course-42.mbz ./course-files
//! mfe --debug ./extracted-backup ./course-files
//! ```
//!
//! The source may be the `.mbz` file or a folder it was unpacked into.
//! Files are written to the destination under their original names, inside
//! their original folder when they belonged to a folder resource. Files
//! already present at the destination are left alone.

pub mod extract;

/// Default log filter for the given verbosity flags.
///
/// `RUST_LOG`, when set, takes precedence over this.
pub fn log_level(debug: bool, verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "warn";
    }
    match (debug, verbose) {
        (false, 0) => "info",
        (_, 0) | (_, 1) => "debug",
        _ => "trace",
    }
}
