//! Store path validation.

use crate::error::{StoreError, StoreResult};

/// Path naming the store root.
pub const ROOT: &str = ".";

/// Split a store path into its segments.
///
/// `.` yields no segments. Anything with a leading or trailing slash, an
/// empty segment, or a `.`/`..` segment is rejected.
pub fn segments(path: &str) -> StoreResult<Vec<&str>> {
    if path == ROOT {
        return Ok(Vec::new());
    }
    let parts: Vec<&str> = path.split('/').collect();
    if parts.iter().any(|p| p.is_empty() || *p == "." || *p == "..") {
        return Err(StoreError::InvalidPath {
            path: path.to_string(),
        });
    }
    Ok(parts)
}

/// Join two store paths, treating `.` as the root.
pub fn join(base: &str, name: &str) -> String {
    if base == ROOT || base.is_empty() {
        name.to_string()
    } else {
        format!("{base}/{name}")
    }
}
