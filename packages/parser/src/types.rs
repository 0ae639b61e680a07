//! Core data types for segmented legal documents.
//!
//! Field names serialize to the Spanish keys used by the published JSON
//! corpus (`Decreto`, `Capítulos`, `Artículos`, ...).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{YEAR_MAX, YEAR_MIN};

/// A fully segmented statute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Promulgation text preceding the normative body; empty when absent.
    #[serde(rename = "Decreto", default)]
    pub preamble: String,

    /// Year of publication, when one could be inferred.
    #[serde(rename = "Año_publicación", default)]
    pub publication_year: Option<i32>,

    /// Official name of the law, never empty.
    #[serde(rename = "Título")]
    pub title: String,

    /// Permanent provisions.
    #[serde(rename = "Capítulos", default)]
    pub chapters: Vec<Chapter>,

    /// Transitory provisions, one chapter per transitorios block.
    #[serde(rename = "Transitorios", default)]
    pub transitory_chapters: Vec<Chapter>,
}

impl Document {
    /// Return a copy with the publication year set.
    ///
    /// Years outside the accepted range are dropped and leave the year unknown.
    #[must_use]
    pub fn with_publication_year(mut self, year: Option<i32>) -> Self {
        self.publication_year = year.filter(|y| (YEAR_MIN..=YEAR_MAX).contains(y));
        self
    }

    /// Number of permanent articles across all chapters.
    #[must_use]
    pub fn permanent_article_count(&self) -> usize {
        self.chapters.iter().map(|c| c.articles.len()).sum()
    }

    /// Number of transitory articles across all transitory chapters.
    #[must_use]
    pub fn transitory_article_count(&self) -> usize {
        self.transitory_chapters.iter().map(|c| c.articles.len()).sum()
    }
}

/// A titled grouping of articles (Título, Capítulo, Sección or Libro).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Header line as it appears in the text.
    #[serde(rename = "Capítulo")]
    pub label: String,

    #[serde(rename = "Artículos", default)]
    pub articles: Vec<Article>,
}

impl Chapter {
    #[must_use]
    pub fn new(label: impl Into<String>, articles: Vec<Article>) -> Self {
        Self {
            label: label.into(),
            articles,
        }
    }
}

/// Article identifier.
///
/// Permanent articles are numbered with Arabic numerals, transitory ones
/// are keyed by ordinal words ("Primero", "Segundo", ...) kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArticleNumber {
    Permanent(u32),
    Transitory(String),
}

impl fmt::Display for ArticleNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Permanent(n) => write!(f, "{n}"),
            Self::Transitory(key) => f.write_str(key),
        }
    }
}

/// A single article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    #[serde(rename = "Artículo")]
    pub number: ArticleNumber,

    /// Text preceding the first fracción, or the whole text without fracciones.
    #[serde(rename = "Texto", default)]
    pub body: String,

    #[serde(rename = "Fracciones", default)]
    pub sub_items: Vec<SubItem>,
}

impl Article {
    #[must_use]
    pub fn new(number: ArticleNumber, body: impl Into<String>) -> Self {
        Self {
            number,
            body: body.into(),
            sub_items: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_sub_items(mut self, sub_items: Vec<SubItem>) -> Self {
        self.sub_items = sub_items;
        self
    }
}

/// A fracción or inciso inside an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubItem {
    /// Marker as written, without a trailing period ("I", "a)", "3)").
    #[serde(rename = "Fracción")]
    pub marker: String,

    #[serde(rename = "Texto", default)]
    pub body: String,
}

impl SubItem {
    #[must_use]
    pub fn new(marker: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            body: body.into(),
        }
    }
}

/// Kind of data-quality signal raised while segmenting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// The text has a structure the rules had to guess at.
    StructuralAmbiguity,
    /// An expected section is absent.
    MissingSection,
}

/// Non-fatal observation about a parsed document.
///
/// Line numbers are 1-based, counted in the decoded input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// No title line found; the title is the sentinel.
    UnidentifiedTitle,
    /// No chapter headers; all articles were put in one implicit chapter.
    ImplicitChapter,
    /// The text starts directly with structure.
    MissingPreamble,
    /// No transitorios block was found.
    MissingTransitory,
    /// An article number was not a plain integer and was mapped to 1.
    AmbiguousArticleNumber { line: usize, token: String },
    /// A chapter header was followed by no article and was discarded.
    EmptyChapterDropped { line: usize, label: String },
    /// Text between the preamble and the first chapter that belongs to no unit.
    UnassignedText { line: usize },
}

impl ParseWarning {
    #[must_use]
    pub fn kind(&self) -> WarningKind {
        match self {
            Self::UnidentifiedTitle | Self::MissingPreamble | Self::MissingTransitory => {
                WarningKind::MissingSection
            }
            Self::ImplicitChapter
            | Self::AmbiguousArticleNumber { .. }
            | Self::EmptyChapterDropped { .. }
            | Self::UnassignedText { .. } => WarningKind::StructuralAmbiguity,
        }
    }
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnidentifiedTitle => write!(f, "no title line found"),
            Self::ImplicitChapter => write!(f, "no chapter headers, using implicit chapter"),
            Self::MissingPreamble => write!(f, "no preamble before the normative text"),
            Self::MissingTransitory => write!(f, "no transitorios section"),
            Self::AmbiguousArticleNumber { line, token } => {
                write!(f, "line {line}: article number '{token}' mapped to 1")
            }
            Self::EmptyChapterDropped { line, label } => {
                write!(f, "line {line}: chapter '{label}' has no articles")
            }
            Self::UnassignedText { line } => {
                write!(f, "line {line}: text before the first chapter was not assigned")
            }
        }
    }
}

/// Result of segmenting one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    pub document: Document,
    pub warnings: Vec<ParseWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_document() -> Document {
        Document {
            preamble: "DECRETO por el que se expide".into(),
            publication_year: Some(2021),
            title: "FEDERAL DE DERECHOS".into(),
            chapters: vec![Chapter::new(
                "CAPÍTULO I",
                vec![Article::new(ArticleNumber::Permanent(5), "Las obligaciones son:")
                    .with_sub_items(vec![SubItem::new("I", "Pagar.")])],
            )],
            transitory_chapters: vec![Chapter::new(
                "TRANSITORIOS",
                vec![Article::new(
                    ArticleNumber::Transitory("Primero".into()),
                    "Entra en vigor.",
                )],
            )],
        }
    }

    #[test]
    fn test_serializes_spanish_keys() {
        let value = serde_json::to_value(sample_document()).unwrap();
        assert_eq!(value["Año_publicación"], 2021);
        assert_eq!(value["Capítulos"][0]["Capítulo"], "CAPÍTULO I");
        assert_eq!(value["Capítulos"][0]["Artículos"][0]["Artículo"], 5);
        assert_eq!(
            value["Capítulos"][0]["Artículos"][0]["Fracciones"][0]["Fracción"],
            "I"
        );
        assert_eq!(value["Transitorios"][0]["Artículos"][0]["Artículo"], "Primero");
    }

    #[test]
    fn test_deserialize_untagged_number() {
        let doc: Document = serde_json::from_value(serde_json::to_value(sample_document()).unwrap())
            .unwrap();
        assert_eq!(doc, sample_document());
    }

    #[test]
    fn test_unknown_year_serializes_as_null() {
        let doc = sample_document().with_publication_year(None);
        let value = serde_json::to_value(doc).unwrap();
        assert!(value["Año_publicación"].is_null());
    }

    #[test]
    fn test_with_publication_year_rejects_out_of_range() {
        assert_eq!(
            sample_document().with_publication_year(Some(1850)).publication_year,
            None
        );
        assert_eq!(
            sample_document().with_publication_year(Some(2031)).publication_year,
            None
        );
        assert_eq!(
            sample_document().with_publication_year(Some(1917)).publication_year,
            Some(1917)
        );
    }

    #[test]
    fn test_article_counts() {
        let doc = sample_document();
        assert_eq!(doc.permanent_article_count(), 1);
        assert_eq!(doc.transitory_article_count(), 1);
    }

    #[test]
    fn test_warning_kinds() {
        assert_eq!(ParseWarning::UnidentifiedTitle.kind(), WarningKind::MissingSection);
        assert_eq!(
            ParseWarning::AmbiguousArticleNumber {
                line: 3,
                token: "Primero".into()
            }
            .kind(),
            WarningKind::StructuralAmbiguity
        );
    }

    #[test]
    fn test_article_number_display() {
        assert_eq!(ArticleNumber::Permanent(12).to_string(), "12");
        assert_eq!(
            ArticleNumber::Transitory("Décimo Primero".into()).to_string(),
            "Décimo Primero"
        );
    }
}
