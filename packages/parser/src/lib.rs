//! Leyes Parser - Segment cleaned Mexican statutory texts.
//!
//! This crate turns the plain text of a Mexican law into a hierarchical
//! document: decree preamble, title, chapters, articles, fracciones and
//! transitorios. Segmentation is deterministic and driven by an ordered
//! table of header patterns.
//!
//! # Example
//!
//! ```
//! use leyes_parser::parse_document;
//!
//! let parsed = parse_document(
//!     "LEY DE AGUAS\nArtículo 5. Las obligaciones son:\nI. Pagar.\nII. Declarar.",
//! )
//! .unwrap();
//!
//! let article = &parsed.document.chapters[0].articles[0];
//! assert_eq!(article.body, "Las obligaciones son:");
//! assert_eq!(article.sub_items.len(), 2);
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Constants and document id validation
//! - [`types`]: Document model and parse warnings
//! - [`error`]: Error types and Result alias
//! - [`decode`]: File reading with encoding fallback
//! - [`text`]: Whitespace and Unicode normalization
//! - [`headers`]: Ordered header classification table
//! - [`segmentation`]: Preamble, chapter, article, fracción and transitorios passes
//! - [`enrich`]: Publication year inference
//! - [`validation`]: JSON schema and post-condition checks
//! - [`output`]: JSON/YAML writer
//! - [`batch`]: File and directory processing
//! - [`extraction`]: Structured extraction through a language-model service
//! - [`cli`]: Command-line interface

pub mod batch;
pub mod cli;
pub mod config;
pub mod decode;
pub mod enrich;
pub mod error;
pub mod extraction;
pub mod headers;
pub mod output;
pub mod segmentation;
pub mod text;
pub mod types;
pub mod validation;

pub use error::{ParserError, Result};
pub use segmentation::Segmenter;
pub use types::{Article, ArticleNumber, Chapter, Document, ParseWarning, ParsedDocument, SubItem};

/// Segment a document with the default header table and infer its
/// publication year.
pub fn parse_document(text: &str) -> Result<ParsedDocument> {
    let mut parsed = Segmenter::default().parse(text)?;
    let year = enrich::infer_publication_year(text);
    parsed.document = parsed.document.with_publication_year(year);
    Ok(parsed)
}
