//! Text normalization helpers shared by all segmentation passes.

use unicode_normalization::UnicodeNormalization;

/// Byte order mark some editors prepend to UTF-8 files.
const BOM: char = '\u{feff}';

/// Prepare decoded text for segmentation.
///
/// Strips a leading BOM and composes the text to NFC so a decomposed
/// "I" + U+0301 matches the same patterns as a precomposed "Í".
pub fn prepare_input(text: &str) -> String {
    text.strip_prefix(BOM).unwrap_or(text).nfc().collect()
}

/// Normalize text stored in the document tree.
///
/// Fixes:
/// - Runs of whitespace (including non-breaking spaces) collapse to one space
/// - En and em dashes become `-`
/// - Leading and trailing whitespace is removed
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .map(|word| word.replace(['\u{2013}', '\u{2014}'], "-"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Join a run of source lines into one normalized paragraph.
///
/// Blank lines are skipped.
pub fn join_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> String {
    let joined = lines
        .into_iter()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    normalize_text(&joined)
}

/// True when the line has letters and none of them is lowercase.
pub fn is_upper_line(line: &str) -> bool {
    line.chars().any(char::is_alphabetic) && !line.chars().any(char::is_lowercase)
}
