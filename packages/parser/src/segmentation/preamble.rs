//! Preamble and title extraction.

use std::sync::LazyLock;

use regex::Regex;

use super::fold::{fold_units, Line, LineEvent};
use super::types::Span;
use crate::config::{MIN_TITLE_LEN, PREAMBLE_LINE_CAP, TITLE_SCAN_LINES};
use crate::headers::{HeaderRegistry, Scope};
use crate::text::{is_upper_line, join_lines, normalize_text};

/// Filler words in front of the distinctive part of a law's name.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static TITLE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:LEY\s+DE\s+INGRESOS\s+DEL\s+|LEY\s+)").expect("valid regex")
});

/// Leading promulgation text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preamble {
    /// Joined, normalized preamble lines; empty when the text opens with structure.
    pub text: String,
    /// Lines the preamble covers.
    pub span: Option<Span>,
    /// Index of the first line after the preamble.
    pub body_start: usize,
}

/// Collect leading non-empty lines until a structural header, capped at
/// [`PREAMBLE_LINE_CAP`] lines.
///
/// When a law title appears within the first [`PREAMBLE_LINE_CAP`] lines,
/// article lines before it are decree text ("ARTÍCULO ÚNICO.- Se expide la
/// Ley ...") and stay in the preamble. Otherwise an article header also ends
/// the preamble.
pub fn extract_preamble(lines: &[Line<'_>], registry: &HeaderRegistry) -> Preamble {
    let titled = lines
        .iter()
        .filter(|line| !line.text.is_empty())
        .take(PREAMBLE_LINE_CAP)
        .any(|line| registry.is_header(line.text, Scope::Title));
    let scope = if titled { Scope::Preamble } else { Scope::Structure };

    let mut taken = 0;
    let segmented = fold_units::<()>(lines, lines.len(), |line| {
        if taken == PREAMBLE_LINE_CAP || registry.is_header(line.text, scope) {
            LineEvent::Stop
        } else {
            taken += 1;
            LineEvent::Body
        }
    });

    let body_start = segmented.stopped_at.unwrap_or(lines.len());
    let span = match (segmented.prelude.first(), segmented.prelude.last()) {
        (Some(first), Some(last)) => Some(Span::new(first.index, last.index + 1)),
        _ => None,
    };

    Preamble {
        text: join_lines(segmented.prelude.iter().map(|l| l.text)),
        span,
        body_start,
    }
}

/// Find the law's name.
///
/// The first LEY/CÓDIGO/CONSTITUCIÓN/REGLAMENTO line wins, with a leading
/// "LEY " or "LEY DE INGRESOS DEL " removed. Otherwise the first uppercase
/// line longer than [`MIN_TITLE_LEN`] characters among the first
/// [`TITLE_SCAN_LINES`] lines. `None` when nothing qualifies.
pub fn extract_title(lines: &[Line<'_>], registry: &HeaderRegistry) -> Option<String> {
    lines
        .iter()
        .filter(|line| registry.is_header(line.text, Scope::Title))
        .map(|line| normalize_text(&TITLE_PREFIX.replace(line.text, "")))
        .find(|title| !title.is_empty())
        .or_else(|| {
            lines
                .iter()
                .take(TITLE_SCAN_LINES)
                .find(|line| line.text.chars().count() > MIN_TITLE_LEN && is_upper_line(line.text))
                .map(|line| normalize_text(line.text))
        })
}
