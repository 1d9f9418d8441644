//! # Metadata Document Reader
//!
//! Every XML document in a backup (`files.xml`, `folder.xml`, `inforef.xml`)
//! is decoded through the same two functions, parameterized by the target
//! shape. Shapes are plain serde-derived structs:
//!
//! - attribute fields are renamed with an `@` prefix (`#[serde(rename = "@id")]`),
//! - nested paths such as `folder > name` are expressed by nesting structs,
//! - fields that live on the in-memory record only are `#[serde(skip)]`,
//! - elements the shape does not name are ignored.
//!
//! The root element name is not checked; callers select by structure.
//!
//! ## Whitespace
//!
//! Text content is kept verbatim, including leading and trailing
//! whitespace (`<filename> a.txt</filename>` decodes as `" a.txt"`). The
//! serde front-end trims text nodes, so before decoding, edge whitespace of
//! every text node that has other content is rewritten as character
//! references, which survive trimming and decode back to the same
//! characters. Text made only of whitespace is treated as layout and
//! decodes as empty.

use std::borrow::Cow;
use std::io::Read;

use quick_xml::events::Event;
use serde::de::DeserializeOwned;

use crate::error::DecodeError;

/// Read `reader` to the end and decode it as a document of shape `T`.
///
/// The whole stream is buffered before decoding starts. Non-UTF-8 input is
/// reported as [`DecodeError::Read`].
pub fn decode<T: DeserializeOwned>(mut reader: impl Read) -> Result<T, DecodeError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let text = String::from_utf8(bytes)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    decode_str(&text)
}

/// Decode an in-memory document of shape `T`.
pub fn decode_str<T: DeserializeOwned>(text: &str) -> Result<T, DecodeError> {
    let protected = protect_edge_whitespace(text)?;
    Ok(quick_xml::de::from_str(&protected)?)
}

fn is_xml_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn push_char_refs(whitespace: &str, out: &mut String) {
    for c in whitespace.chars() {
        out.push_str(&format!("&#{};", u32::from(c)));
    }
}

/// Rewrite leading and trailing whitespace of non-blank text nodes as
/// character references. Returns the input unchanged when nothing needs it.
fn protect_edge_whitespace(text: &str) -> Result<Cow<'_, str>, DecodeError> {
    let mut reader = quick_xml::Reader::from_str(text);
    let mut out = String::new();
    let mut copied = 0;

    loop {
        let start = reader.buffer_position() as usize;
        let event = reader.read_event().map_err(quick_xml::DeError::from)?;
        let raw = match event {
            Event::Eof => break,
            Event::Text(ref t) => &**t,
            _ => continue,
        };
        let end = start + raw.len();
        let Some(content) = text.get(start..end) else {
            continue;
        };
        if content.as_bytes() != raw {
            continue;
        }

        let body = content.trim_matches(is_xml_space);
        if body.is_empty() || body.len() == content.len() {
            continue;
        }
        let lead = content.len() - content.trim_start_matches(is_xml_space).len();
        let tail = content.trim_end_matches(is_xml_space).len();

        out.push_str(&text[copied..start]);
        push_char_refs(&content[..lead], &mut out);
        out.push_str(&content[lead..tail]);
        push_char_refs(&content[tail..], &mut out);
        copied = end;
    }

    if copied == 0 {
        return Ok(Cow::Borrowed(text));
    }
    out.push_str(&text[copied..]);
    Ok(Cow::Owned(out))
}
