//! Document validation: JSON schema conformance and post-conditions.

use std::fmt;

use jsonschema::Validator;
use serde_json::Value;

use crate::error::{ParserError, Result};
use crate::types::Document;

const SCHEMA_JSON: &str = include_str!("../schema/document.schema.json");

/// Validates serialized documents against the published JSON schema.
pub struct SchemaValidator {
    validator: Validator,
}

impl SchemaValidator {
    /// Compile the embedded document schema.
    pub fn new() -> Result<Self> {
        let schema: Value =
            serde_json::from_str(SCHEMA_JSON).map_err(|e| ParserError::SchemaLoad(e.to_string()))?;

        let validator = Validator::new(&schema)
            .map_err(|e| ParserError::SchemaLoad(format!("failed to compile schema: {e}")))?;

        Ok(Self { validator })
    }

    /// Validate a JSON value shaped like a [`Document`].
    ///
    /// Returns `Err(SchemaValidation)` listing every violation.
    pub fn validate(&self, value: &Value) -> Result<()> {
        let errors: Vec<String> = self
            .validator
            .iter_errors(value)
            .map(|e| {
                let path = e.instance_path().to_string();
                if path.is_empty() {
                    e.to_string()
                } else {
                    format!("{path}: {e}")
                }
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ParserError::SchemaValidation { errors })
        }
    }

    /// Serialize and validate a document.
    pub fn validate_document(&self, document: &Document) -> Result<()> {
        self.validate(&serde_json::to_value(document)?)
    }
}

/// How serious a post-condition issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Error,
}

/// One post-condition finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub message: String,
}

impl ValidationIssue {
    fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Info => "info",
            Severity::Error => "error",
        };
        write!(f, "{level}: {}", self.message)
    }
}

/// Check the conditions a document must meet before it is written.
///
/// A document with no permanent article is an error. An empty preamble or
/// a missing transitorios section is only informational.
#[must_use]
pub fn check_postconditions(document: &Document) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if document.permanent_article_count() == 0 {
        issues.push(ValidationIssue::error("no permanent articles found"));
    }
    if document.preamble.is_empty() {
        issues.push(ValidationIssue::info("no decree preamble"));
    }
    if document.transitory_chapters.is_empty() {
        issues.push(ValidationIssue::info("no transitory provisions"));
    }

    issues
}

/// Fail with [`ParserError::Postcondition`] when any issue is an error.
pub fn ensure_publishable(issues: &[ValidationIssue]) -> Result<()> {
    let errors: Vec<String> = issues
        .iter()
        .filter(|issue| issue.severity == Severity::Error)
        .map(|issue| issue.message.clone())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ParserError::Postcondition { errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Article, ArticleNumber, Chapter, SubItem};
    use pretty_assertions::assert_eq;

    fn document() -> Document {
        Document {
            preamble: "DECRETO".into(),
            publication_year: Some(1995),
            title: "FEDERAL DEL TRABAJO".into(),
            chapters: vec![Chapter::new(
                "CAPÍTULO I",
                vec![Article::new(ArticleNumber::Permanent(1), "Objeto.")
                    .with_sub_items(vec![SubItem::new("I", "Uno.")])],
            )],
            transitory_chapters: vec![Chapter::new(
                "TRANSITORIOS",
                vec![Article::new(ArticleNumber::Transitory("Único".into()), "Vigor.")],
            )],
        }
    }

    #[test]
    fn test_validator_creation() {
        assert!(SchemaValidator::new().is_ok());
    }

    #[test]
    fn test_valid_document() {
        let validator = SchemaValidator::new().expect("validator");
        assert!(validator.validate_document(&document()).is_ok());
    }

    #[test]
    fn test_unknown_year_is_valid() {
        let validator = SchemaValidator::new().expect("validator");
        let doc = Document {
            publication_year: None,
            ..document()
        };
        assert!(validator.validate_document(&doc).is_ok());
    }

    #[test]
    fn test_string_number_in_permanent_chapter_rejected() {
        let validator = SchemaValidator::new().expect("validator");
        let mut value = serde_json::to_value(document()).unwrap();
        value["Capítulos"][0]["Artículos"][0]["Artículo"] = "Primero".into();

        match validator.validate(&value) {
            Err(ParserError::SchemaValidation { errors }) => {
                assert!(errors[0].starts_with("/Capítulos/0/Artículos/0/Artículo"));
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_key_rejected() {
        let validator = SchemaValidator::new().expect("validator");
        let mut value = serde_json::to_value(document()).unwrap();
        value["Autor"] = "nadie".into();
        assert!(validator.validate(&value).is_err());
    }

    #[test]
    fn test_postconditions_clean() {
        assert!(check_postconditions(&document()).is_empty());
    }

    #[test]
    fn test_postconditions() {
        let doc = Document {
            preamble: String::new(),
            chapters: Vec::new(),
            transitory_chapters: Vec::new(),
            ..document()
        };
        let issues = check_postconditions(&doc);
        let severities: Vec<Severity> = issues.iter().map(|i| i.severity).collect();
        assert_eq!(severities, vec![Severity::Error, Severity::Info, Severity::Info]);
        assert!(ensure_publishable(&issues).is_err());
        assert!(ensure_publishable(&issues[1..]).is_ok());
    }
}
