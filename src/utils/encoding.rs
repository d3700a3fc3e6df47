//! Text decoding for configuration files.
//!
//! Configuration files are UTF-8. A byte-order mark (UTF-8 or UTF-16 LE/BE)
//! is honoured and removed; anything that does not decode cleanly is
//! reported as malformed rather than silently replaced.

use encoding_rs::{Encoding, UTF_8};
use std::io::ErrorKind;
use std::path::Path;

/// Result of reading a configuration file from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextFile {
    /// The path does not exist.
    Missing,
    /// Decoded file contents.
    Text(String),
    /// The file exists but is not valid text; carries the reason.
    Malformed(String),
}

/// Read and decode a text file.
///
/// Absence is not an error. Any other I/O failure (permissions, reading a
/// directory, ...) is returned to the caller.
pub fn read_text_file(path: &Path) -> std::io::Result<TextFile> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(TextFile::Missing),
        Err(err) => return Err(err),
    };
    Ok(decode_text(&bytes))
}

/// Decode bytes, stripping a BOM when present.
pub fn decode_text(bytes: &[u8]) -> TextFile {
    let (encoding, bom_len) = Encoding::for_bom(bytes).unwrap_or((UTF_8, 0));
    match encoding.decode_without_bom_handling_and_without_replacement(&bytes[bom_len..]) {
        Some(text) => TextFile::Text(text.into_owned()),
        None => TextFile::Malformed(format!("content is not valid {}", encoding.name())),
    }
}
