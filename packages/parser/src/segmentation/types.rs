//! Outline types produced by the segmentation passes.
//!
//! Outline units mirror the document model but keep the source line span of
//! every unit, so ordering and non-overlap can be checked.

use crate::config::UNIDENTIFIED_TITLE;
use crate::types::{Article, ArticleNumber, Chapter, Document, ParseWarning, ParsedDocument, SubItem};

/// Half-open range of 0-based line indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    #[must_use]
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentedSubItem {
    pub marker: String,
    pub body: String,
    pub span: Span,
}

impl SegmentedSubItem {
    #[must_use]
    pub fn into_sub_item(self) -> SubItem {
        SubItem::new(self.marker, self.body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentedArticle {
    pub number: ArticleNumber,
    pub body: String,
    pub sub_items: Vec<SegmentedSubItem>,
    pub span: Span,
}

impl SegmentedArticle {
    #[must_use]
    pub fn into_article(self) -> Article {
        Article::new(self.number, self.body).with_sub_items(
            self.sub_items
                .into_iter()
                .map(SegmentedSubItem::into_sub_item)
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentedChapter {
    pub label: String,
    pub articles: Vec<SegmentedArticle>,
    /// Span of the chapter; for implicit chapters it starts at the first body line.
    pub span: Span,
    /// True for the synthesized "CAPÍTULO ÚNICO".
    pub implicit: bool,
}

impl SegmentedChapter {
    #[must_use]
    pub fn into_chapter(self) -> Chapter {
        Chapter::new(
            self.label,
            self.articles
                .into_iter()
                .map(SegmentedArticle::into_article)
                .collect(),
        )
    }
}

/// Full outline of a document, before year enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation {
    pub preamble: String,
    /// Lines consumed by the preamble, `None` when it is empty.
    pub preamble_span: Option<Span>,
    /// Title, or `None` when no line qualified.
    pub title: Option<String>,
    pub chapters: Vec<SegmentedChapter>,
    pub transitory_chapters: Vec<SegmentedChapter>,
    pub warnings: Vec<ParseWarning>,
}

impl Segmentation {
    /// Drop spans and build the document model.
    ///
    /// The publication year is left unknown.
    #[must_use]
    pub fn into_parsed(self) -> ParsedDocument {
        let document = Document {
            preamble: self.preamble,
            publication_year: None,
            title: self
                .title
                .unwrap_or_else(|| UNIDENTIFIED_TITLE.to_string()),
            chapters: self
                .chapters
                .into_iter()
                .map(SegmentedChapter::into_chapter)
                .collect(),
            transitory_chapters: self
                .transitory_chapters
                .into_iter()
                .map(SegmentedChapter::into_chapter)
                .collect(),
        };

        ParsedDocument {
            document,
            warnings: self.warnings,
        }
    }

    /// Every article span, permanent then transitory, in document order.
    pub fn article_spans(&self) -> impl Iterator<Item = Span> + '_ {
        self.chapters
            .iter()
            .chain(&self.transitory_chapters)
            .flat_map(|c| c.articles.iter().map(|a| a.span))
    }
}
