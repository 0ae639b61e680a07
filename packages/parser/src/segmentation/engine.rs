//! Segmenter that runs the passes over one document.

use super::chapters::{locate_layout, segment_chapters};
use super::fold::split_lines;
use super::preamble::{extract_preamble, extract_title};
use super::transitory::segment_transitory;
use super::types::Segmentation;
use crate::error::{ParserError, Result};
use crate::headers::{create_mexican_law_registry, HeaderRegistry};
use crate::text::prepare_input;
use crate::types::{ParseWarning, ParsedDocument};

/// Deterministic segmenter for statutory text.
///
/// Passes run top-down: preamble and title, chapter layout, articles within
/// each chapter, fracciones within each article, then the transitorios.
/// Each pass reads a line range and returns completed units; nothing is
/// shared between passes except the header table.
#[derive(Debug, Clone)]
pub struct Segmenter {
    registry: HeaderRegistry,
}

impl Segmenter {
    /// Create a segmenter over a custom header table.
    #[must_use]
    pub fn new(registry: HeaderRegistry) -> Self {
        Self { registry }
    }

    /// Header table in use.
    #[must_use]
    pub fn registry(&self) -> &HeaderRegistry {
        &self.registry
    }

    /// Build the outline of a document, with line spans.
    pub fn segment(&self, text: &str) -> Result<Segmentation> {
        let prepared = prepare_input(text);
        let lines = split_lines(&prepared);
        if lines.iter().all(|line| line.text.is_empty()) {
            return Err(ParserError::EmptyInput);
        }

        let mut warnings = Vec::new();

        let preamble = extract_preamble(&lines, &self.registry);
        if preamble.text.is_empty() {
            warnings.push(ParseWarning::MissingPreamble);
        }

        let title = extract_title(&lines, &self.registry);
        if title.is_none() {
            warnings.push(ParseWarning::UnidentifiedTitle);
        }

        let layout = locate_layout(&lines, preamble.body_start, &self.registry);
        let chapters = segment_chapters(&lines, &layout, &self.registry, &mut warnings);

        let transitory_chapters = match layout.transitory_start {
            Some(start) => segment_transitory(&lines, start, &self.registry, &mut warnings),
            None => Vec::new(),
        };
        if transitory_chapters.is_empty() {
            warnings.push(ParseWarning::MissingTransitory);
        }

        tracing::debug!(
            lines = lines.len(),
            body_start = preamble.body_start,
            transitory_start = ?layout.transitory_start,
            chapters = chapters.len(),
            transitory_chapters = transitory_chapters.len(),
            warnings = warnings.len(),
            "Segmented document"
        );

        Ok(Segmentation {
            preamble: preamble.text,
            preamble_span: preamble.span,
            title,
            chapters,
            transitory_chapters,
            warnings,
        })
    }

    /// Segment a document into the span-free model.
    ///
    /// The publication year is left unknown; see [`crate::enrich`].
    pub fn parse(&self, text: &str) -> Result<ParsedDocument> {
        self.segment(text).map(Segmentation::into_parsed)
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(create_mexican_law_registry())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ArticleNumber;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_input() {
        let segmenter = Segmenter::default();
        assert!(matches!(segmenter.parse(""), Err(ParserError::EmptyInput)));
        assert!(matches!(segmenter.parse(" \n\t\n"), Err(ParserError::EmptyInput)));
    }

    #[test]
    fn test_full_document() {
        let text = "\
DECRETO por el que se expide la Ley que se indica.
LEY DE AGUAS DEL ESTADO
CAPÍTULO I
Disposiciones generales
Artículo 1. Esta ley es de orden público.
Artículo 2. Son autoridades:
I. El Gobernador.
II. La Comisión.
CAPÍTULO II
Artículo 3. Vigilancia.
TRANSITORIOS
Primero. Este decreto entra en vigor al día siguiente.
Segundo. Se derogan las disposiciones contrarias.
";
        let parsed = Segmenter::default().parse(text).unwrap();
        let doc = parsed.document;

        assert_eq!(doc.preamble, "DECRETO por el que se expide la Ley que se indica.");
        assert_eq!(doc.title, "DE AGUAS DEL ESTADO");
        assert_eq!(doc.chapters.len(), 2);
        assert_eq!(doc.chapters[0].articles.len(), 2);
        assert_eq!(doc.chapters[0].articles[1].sub_items.len(), 2);
        assert_eq!(doc.chapters[1].articles[0].body, "Vigilancia.");
        assert_eq!(doc.transitory_chapters.len(), 1);
        assert_eq!(
            doc.transitory_chapters[0].articles[1].number,
            ArticleNumber::Transitory("Segundo".into())
        );
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_missing_sections_warn() {
        let parsed = Segmenter::default().parse("Artículo 1. Único texto.").unwrap();
        assert!(parsed.warnings.contains(&ParseWarning::MissingPreamble));
        assert!(parsed.warnings.contains(&ParseWarning::MissingTransitory));
        assert!(parsed.warnings.contains(&ParseWarning::UnidentifiedTitle));
        assert!(parsed.warnings.contains(&ParseWarning::ImplicitChapter));
    }
}
