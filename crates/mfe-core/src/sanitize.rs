//! # Name Sanitization
//!
//! Filenames and folder names in a course backup come straight from user
//! input on the LMS and may contain characters that Windows, macOS or Linux
//! refuse in a path component. [`sanitize`] deletes them.
//!
//! The forbidden set is `< > : " / \ | ? *` plus every C0 control character
//! (U+0000 to U+001F). Characters are removed, never substituted, so a run of
//! forbidden characters collapses to nothing.

/// Returns `true` if `c` may not appear in a sanitized name.
pub fn is_forbidden(c: char) -> bool {
    matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') || c <= '\u{1f}'
}

/// Strip every forbidden character from `name`.
///
/// Total and deterministic. The output is always a subsequence of the input,
/// so `sanitize(&sanitize(s)) == sanitize(s)`.
pub fn sanitize(name: &str) -> String {
    name.chars().filter(|c| !is_forbidden(*c)).collect()
}
