//! Configuration constants and validation functions for the parser.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ParserError, Result};

/// Maximum number of non-empty lines collected into the preamble.
pub const PREAMBLE_LINE_CAP: usize = 10;

/// Number of leading lines searched for an uppercase fallback title.
pub const TITLE_SCAN_LINES: usize = 10;

/// An uppercase fallback title must be longer than this many characters.
pub const MIN_TITLE_LEN: usize = 10;

/// Oldest publication year accepted.
pub const YEAR_MIN: i32 = 1900;

/// Newest publication year accepted, regardless of the current date.
pub const YEAR_MAX: i32 = 2030;

/// Title used when no line qualifies as the law's name.
pub const UNIDENTIFIED_TITLE: &str = "Título no identificado";

/// Label of the chapter synthesized for texts without chapter headers.
pub const IMPLICIT_CHAPTER_LABEL: &str = "CAPÍTULO ÚNICO";

/// Default directory for generated JSON files.
pub const DEFAULT_OUTPUT_DIR: &str = "Refined/json";

/// File name prefix of cleaned input transcriptions.
pub const DEFAULT_FILE_PREFIX: &str = "clean_";

/// Largest input file the reader accepts (50 MB).
///
/// The biggest federal codes are a few megabytes of plain text.
pub const MAX_INPUT_BYTES: u64 = 50 * 1024 * 1024;

/// Normative fragments sent to the extraction service are split at article
/// headers once they exceed this many characters.
pub const EXTRACTION_CHUNK_LIMIT: usize = 3000;

/// Document id pattern: letters, digits, '_', '-' and inner dots.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DOCUMENT_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{N}_-][\p{L}\p{N}_.-]*$").expect("valid regex"));

/// Validate a document identifier.
///
/// # Examples
/// ```
/// use leyes_parser::config::validate_document_id;
///
/// assert!(validate_document_id("ley_federal_del_trabajo").is_ok());
/// assert!(validate_document_id("../etc").is_err());
/// ```
pub fn validate_document_id(id: &str) -> Result<()> {
    if DOCUMENT_ID_PATTERN.is_match(id) {
        Ok(())
    } else {
        Err(ParserError::InvalidDocumentId(id.to_string()))
    }
}

/// Derive the document identifier from an input path.
///
/// The identifier is the file stem with `prefix` removed from its start,
/// so `clean_ley_aduanera.txt` becomes `ley_aduanera`.
///
/// # Examples
/// ```
/// use std::path::Path;
/// use leyes_parser::config::document_id_from_path;
///
/// let id = document_id_from_path(Path::new("in/clean_ley_aduanera.txt"), "clean_").unwrap();
/// assert_eq!(id, "ley_aduanera");
/// ```
pub fn document_id_from_path(path: &Path, prefix: &str) -> Result<String> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ParserError::InvalidDocumentId(path.display().to_string()))?;

    let id = stem.strip_prefix(prefix).unwrap_or(stem);
    validate_document_id(id)?;
    Ok(id.to_string())
}

/// File name used for a document's output in the given format.
pub fn output_file_name(id: &str, extension: &str) -> String {
    format!("{id}.{extension}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_document_id_valid() {
        assert!(validate_document_id("123").is_ok());
        assert!(validate_document_id("ley-de-amparo").is_ok());
        assert!(validate_document_id("código_civil").is_ok());
        assert!(validate_document_id("lfpca.2024").is_ok());
    }

    #[test]
    fn test_validate_document_id_invalid() {
        assert!(validate_document_id("").is_err());
        assert!(validate_document_id(".hidden").is_err());
        assert!(validate_document_id("a/b").is_err());
        assert!(validate_document_id("con espacio").is_err());
    }

    #[test]
    fn test_document_id_strips_prefix() {
        let id = document_id_from_path(Path::new("/tmp/clean_0042.txt"), "clean_").unwrap();
        assert_eq!(id, "0042");
    }

    #[test]
    fn test_document_id_without_prefix() {
        let id = document_id_from_path(Path::new("ley_minera.txt"), "clean_").unwrap();
        assert_eq!(id, "ley_minera");
    }

    #[test]
    fn test_document_id_prefix_only() {
        assert!(document_id_from_path(Path::new("clean_.txt"), "clean_").is_err());
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("0042", "json"), "0042.json");
    }
}
