//! Error types for metadata document decoding.

use thiserror::Error;

/// Failure to turn a metadata document into a typed shape.
///
/// Decoding is all-or-nothing: when this error is returned no part of the
/// target shape is handed back to the caller.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The underlying stream could not be read to the end, or it was not
    /// valid UTF-8.
    #[error("failed to read document: {0}")]
    Read(#[from] std::io::Error),

    /// The bytes were read but do not form a document of the expected shape.
    #[error("malformed XML document: {0}")]
    Xml(#[from] quick_xml::DeError),
}
