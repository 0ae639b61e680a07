//! Fracción splitting inside one article.

use super::fold::{fold_units, Line, LineEvent};
use super::types::{SegmentedSubItem, Span};
use crate::headers::{HeaderRegistry, LineClass, Scope};
use crate::text::join_lines;

/// Article text split at its fracciones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitBody {
    /// Text before the first fracción, or all text when there is none.
    pub body: String,
    pub sub_items: Vec<SegmentedSubItem>,
}

/// Split an article's accumulated lines into leading body and fracciones.
///
/// The first line that looks like a fracción marker ends the body, wherever
/// it appears. Markers are kept as written, never renumbered.
pub fn split_sub_items(lines: &[Line<'_>], range_end: usize, registry: &HeaderRegistry) -> SplitBody {
    let segmented = fold_units(lines, range_end, |line| {
        match registry.classify(line.text, Scope::SubItems) {
            LineClass::SubItem { marker, rest } => LineEvent::Header {
                header: marker,
                rest,
            },
            _ => LineEvent::Body,
        }
    });

    let sub_items = segmented
        .units
        .into_iter()
        .map(|unit| SegmentedSubItem {
            marker: unit.header.to_string(),
            body: join_lines(unit.lines.iter().map(|l| l.text)),
            span: Span::new(unit.start, unit.end),
        })
        .collect();

    SplitBody {
        body: join_lines(segmented.prelude.iter().map(|l| l.text)),
        sub_items,
    }
}
