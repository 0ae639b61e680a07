//! Reading input files with an ordered encoding fallback.
//!
//! Transcriptions arrive as UTF-8, ISO-8859-1 or Windows-1252. Decoders are
//! tried in that order and the first that accepts every byte wins.

use std::fs;
use std::path::Path;

use crate::config::MAX_INPUT_BYTES;
use crate::error::{ParserError, Result};

/// Encodings the reader knows about, in fallback order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    Utf8,
    Latin1,
    Windows1252,
}

impl SourceEncoding {
    /// Fallback order used by [`decode_bytes`].
    pub const FALLBACK_ORDER: [SourceEncoding; 3] = [Self::Utf8, Self::Latin1, Self::Windows1252];

    /// Lowercase label as used in logs and errors.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Latin1 => "latin-1",
            Self::Windows1252 => "windows-1252",
        }
    }

    /// Decode `bytes`, or `None` when they are not valid in this encoding.
    #[must_use]
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
            Self::Latin1 => decode_latin1(bytes),
            Self::Windows1252 => decode_windows1252(bytes),
        }
    }
}

/// Decoded file contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding: SourceEncoding,
}

/// ISO-8859-1 maps every byte to the code point of the same value.
///
/// Bytes 0x80-0x9F are C1 controls that never occur in real text, so their
/// presence means the file is Windows-1252 and the decoder refuses it.
fn decode_latin1(bytes: &[u8]) -> Option<String> {
    if bytes.iter().any(|b| (0x80..=0x9F).contains(b)) {
        return None;
    }
    Some(bytes.iter().map(|&b| char::from(b)).collect())
}

/// Windows-1252 code points for bytes 0x80-0x9F. `None` marks the five
/// undefined positions.
const WINDOWS_1252_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'),
    None,
    Some('\u{201A}'),
    Some('\u{0192}'),
    Some('\u{201E}'),
    Some('\u{2026}'),
    Some('\u{2020}'),
    Some('\u{2021}'),
    Some('\u{02C6}'),
    Some('\u{2030}'),
    Some('\u{0160}'),
    Some('\u{2039}'),
    Some('\u{0152}'),
    None,
    Some('\u{017D}'),
    None,
    None,
    Some('\u{2018}'),
    Some('\u{2019}'),
    Some('\u{201C}'),
    Some('\u{201D}'),
    Some('\u{2022}'),
    Some('\u{2013}'),
    Some('\u{2014}'),
    Some('\u{02DC}'),
    Some('\u{2122}'),
    Some('\u{0161}'),
    Some('\u{203A}'),
    Some('\u{0153}'),
    None,
    Some('\u{017E}'),
    Some('\u{0178}'),
];

fn decode_windows1252(bytes: &[u8]) -> Option<String> {
    bytes
        .iter()
        .map(|&b| match b {
            0x80..=0x9F => WINDOWS_1252_HIGH[usize::from(b - 0x80)],
            _ => Some(char::from(b)),
        })
        .collect()
}

/// Decode raw bytes with the fallback order UTF-8, Latin-1, Windows-1252.
///
/// Returns `None` when every decoder rejects the input.
pub fn decode_bytes(bytes: &[u8]) -> Option<DecodedText> {
    SourceEncoding::FALLBACK_ORDER.iter().find_map(|encoding| {
        encoding.decode(bytes).map(|text| DecodedText {
            text,
            encoding: *encoding,
        })
    })
}

/// Read and decode a transcription from disk.
pub fn read_document(path: &Path) -> Result<DecodedText> {
    let size = fs::metadata(path)?.len();
    if size > MAX_INPUT_BYTES {
        return Err(ParserError::InputTooLarge {
            path: path.to_path_buf(),
            size,
            limit: MAX_INPUT_BYTES,
        });
    }

    let bytes = fs::read(path)?;
    let decoded = decode_bytes(&bytes).ok_or_else(|| ParserError::UndecodableInput {
        path: path.to_path_buf(),
        attempted: SourceEncoding::FALLBACK_ORDER
            .iter()
            .map(SourceEncoding::as_str)
            .collect(),
    })?;

    if decoded.encoding != SourceEncoding::Utf8 {
        tracing::debug!(
            path = %path.display(),
            encoding = decoded.encoding.as_str(),
            "Decoded with fallback encoding"
        );
    }

    Ok(decoded)
}
