//! Chapter boundaries and the start of the transitorios block.

use super::articles::segment_articles;
use super::fold::{fold_units, Line, LineEvent};
use super::types::{SegmentedChapter, Span};
use crate::config::IMPLICIT_CHAPTER_LABEL;
use crate::headers::{HeaderRegistry, LineClass, Scope};
use crate::text::normalize_text;
use crate::types::ParseWarning;

/// Where the permanent body ends and the transitorios begin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChapterLayout {
    /// First line after the preamble.
    pub body_start: usize,
    /// Start of the last chapter header before the transitorios, if any.
    pub last_chapter_start: Option<usize>,
    /// First transitorios header after the preamble.
    pub transitory_start: Option<usize>,
    /// One past the last line of the document.
    pub document_end: usize,
}

impl ChapterLayout {
    /// End of the permanent body: the transitorios start or end of document.
    #[must_use]
    pub fn permanent_end(&self) -> usize {
        self.transitory_start.unwrap_or(self.document_end)
    }
}

/// Locate the transitorios block and the last chapter header before it.
///
/// The transitorios start is the first transitorios header after the
/// preamble. Chapter-looking lines at or after it belong to the transitory
/// provisions, so the last chapter is the last header before that start and
/// the last chapter ends where the transitorios begin.
pub fn locate_layout(lines: &[Line<'_>], body_start: usize, registry: &HeaderRegistry) -> ChapterLayout {
    let body = lines.get(body_start..).unwrap_or_default();

    let transitory_start = body
        .iter()
        .find(|line| registry.is_header(line.text, Scope::TransitoryBoundary))
        .map(|line| line.index);

    let permanent_end = transitory_start.unwrap_or(lines.len());
    let last_chapter_start = lines
        .get(body_start..permanent_end)
        .unwrap_or_default()
        .iter()
        .rev()
        .find(|line| registry.is_header(line.text, Scope::Chapters))
        .map(|line| line.index);

    ChapterLayout {
        body_start,
        last_chapter_start,
        transitory_start,
        document_end: lines.len(),
    }
}

/// Segment the permanent body into chapters with their articles.
///
/// Chapters that end up without articles are dropped. Without any chapter
/// header the whole body becomes one implicit "CAPÍTULO ÚNICO".
pub fn segment_chapters(
    lines: &[Line<'_>],
    layout: &ChapterLayout,
    registry: &HeaderRegistry,
    warnings: &mut Vec<ParseWarning>,
) -> Vec<SegmentedChapter> {
    let end = layout.permanent_end();
    let body = lines.get(layout.body_start..end).unwrap_or_default();

    let segmented = fold_units(body, end, |line| {
        match registry.classify(line.text, Scope::Chapters) {
            LineClass::Chapter { label } => LineEvent::Header {
                header: label,
                rest: "",
            },
            _ => LineEvent::Body,
        }
    });

    if segmented.units.is_empty() {
        let articles = segment_articles(&segmented.prelude, end, registry, warnings);
        if articles.is_empty() {
            return Vec::new();
        }
        warnings.push(ParseWarning::ImplicitChapter);
        return vec![SegmentedChapter {
            label: IMPLICIT_CHAPTER_LABEL.to_string(),
            articles,
            span: Span::new(layout.body_start, end),
            implicit: true,
        }];
    }

    let unassigned = segmented
        .prelude
        .iter()
        .find(|line| !registry.is_header(line.text, Scope::Title));
    if let Some(line) = unassigned {
        tracing::debug!(
            line = line.index + 1,
            lines = segmented.prelude.len(),
            "Text between preamble and first chapter"
        );
        warnings.push(ParseWarning::UnassignedText {
            line: line.index + 1,
        });
    }

    segmented
        .units
        .into_iter()
        .filter_map(|unit| {
            let label = normalize_text(unit.header);
            let articles = segment_articles(&unit.lines, unit.end, registry, warnings);
            if articles.is_empty() {
                tracing::debug!(line = unit.start + 1, label = %label, "Dropping chapter without articles");
                warnings.push(ParseWarning::EmptyChapterDropped {
                    line: unit.start + 1,
                    label,
                });
                return None;
            }
            Some(SegmentedChapter {
                label,
                articles,
                span: Span::new(unit.start, unit.end),
                implicit: false,
            })
        })
        .collect()
}
