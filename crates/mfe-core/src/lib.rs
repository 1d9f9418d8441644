//! # mfe-core — Foundational Types for the Moodle File Extractor
//!
//! This crate holds the leaf utilities every other `mfe-*` crate builds on.
//! It depends on nothing internal.
//!
//! - [`record`]: `FileRecord` (one payload entry from `files.xml`) and
//!   `FileMapping`, the id-keyed map built once, annotated with folders,
//!   then read during materialization.
//! - [`sanitize`]: strips characters that are illegal in common filesystem
//!   names from filenames and folder names.
//! - [`document`]: decodes any serde-shaped XML document from a byte stream.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod document;
pub mod error;
pub mod record;
pub mod sanitize;

pub use document::{decode, decode_str};
pub use error::DecodeError;
pub use record::{FileMapping, FileRecord, CURRENT_DIR_PLACEHOLDER};
pub use sanitize::{is_forbidden, sanitize};
