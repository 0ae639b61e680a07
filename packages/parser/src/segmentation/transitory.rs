//! Transitorios segmentation.
//!
//! Each transitorios header opens a block (reform decrees append several).
//! Inside a block the first item header fixes the numbering dialect; headers
//! of another dialect are ordinary text, so "I." under "Primero." becomes a
//! fracción of that article.

use super::fold::{fold_units, Line, LineEvent};
use super::subitems::split_sub_items;
use super::types::{SegmentedArticle, SegmentedChapter, Span};
use crate::headers::{HeaderRegistry, LineClass, Scope, TransitoryDialect};
use crate::text::normalize_text;
use crate::types::{ArticleNumber, ParseWarning};

/// Segment the transitory provisions starting at `start`.
///
/// Returns one chapter per block that holds at least one article, labeled
/// with the block header as written.
pub fn segment_transitory(
    lines: &[Line<'_>],
    start: usize,
    registry: &HeaderRegistry,
    warnings: &mut Vec<ParseWarning>,
) -> Vec<SegmentedChapter> {
    let end = lines.len();
    let block_lines = lines.get(start..).unwrap_or_default();

    let blocks = fold_units(block_lines, end, |line| {
        match registry.classify(line.text, Scope::TransitoryBoundary) {
            LineClass::TransitoryBlock => LineEvent::Header {
                header: line.text,
                rest: "",
            },
            _ => LineEvent::Body,
        }
    });

    blocks
        .units
        .into_iter()
        .filter_map(|block| {
            let label = normalize_text(block.header);
            let articles = segment_items(&block.lines, block.end, registry);
            if articles.is_empty() {
                tracing::debug!(line = block.start + 1, label = %label, "Transitorios block without items");
                warnings.push(ParseWarning::EmptyChapterDropped {
                    line: block.start + 1,
                    label,
                });
                return None;
            }
            Some(SegmentedChapter {
                label,
                articles,
                span: Span::new(block.start, block.end),
                implicit: false,
            })
        })
        .collect()
}

/// Segment the items of one block with dialect locking.
fn segment_items(
    lines: &[Line<'_>],
    range_end: usize,
    registry: &HeaderRegistry,
) -> Vec<SegmentedArticle> {
    let mut dialect: Option<TransitoryDialect> = None;

    let segmented = fold_units(lines, range_end, |line| {
        match registry.classify(line.text, Scope::TransitoryItems) {
            LineClass::TransitoryItem {
                key,
                dialect: found,
                rest,
            } if dialect.is_none() || dialect == Some(found) => {
                dialect = Some(found);
                LineEvent::Header { header: key, rest }
            }
            _ => LineEvent::Body,
        }
    });

    segmented
        .units
        .into_iter()
        .map(|unit| {
            let split = split_sub_items(&unit.lines, unit.end, registry);
            SegmentedArticle {
                number: ArticleNumber::Transitory(normalize_text(unit.header)),
                body: split.body,
                sub_items: split.sub_items,
                span: Span::new(unit.start, unit.end),
            }
        })
        .collect()
}
