//! Error types for the parser.
//!
//! Structural ambiguity never produces an error: the segmenter always returns
//! a tree and reports doubtful spots as [`ParseWarning`](crate::types::ParseWarning)s.
//! The variants here cover unreadable input, output failures, validation and
//! the optional extraction service.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the parser library.
#[derive(Debug, Error)]
pub enum ParserError {
    /// The decoded text contains no non-blank line.
    #[error("Input text is empty")]
    EmptyInput,

    /// None of the fallback encodings could decode the file.
    #[error("Could not decode {} (tried {})", path.display(), attempted.join(", "))]
    UndecodableInput {
        path: PathBuf,
        attempted: Vec<&'static str>,
    },

    /// The file is larger than the reader accepts.
    #[error("Input {} is {size} bytes, above the {limit} byte limit", path.display())]
    InputTooLarge { path: PathBuf, size: u64, limit: u64 },

    /// Document identifier derived from a file name is unusable.
    #[error("Invalid document id: '{0}'. Expected letters, digits, '.', '_' or '-'")]
    InvalidDocumentId(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error.
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// HTTP request to the extraction service failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Extraction service answered with a non-success status.
    #[error("Extraction service returned {status}: {message}")]
    ServiceError { status: u16, message: String },

    /// Extraction service answered with something that is not the expected JSON.
    #[error("Malformed extraction response: {0}")]
    MalformedResponse(String),

    /// Extraction service answered without content.
    #[error("Extraction service returned an empty response")]
    EmptyResponse,

    /// All retry attempts failed.
    #[error("Request failed after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },

    /// The embedded JSON schema could not be compiled.
    #[error("Failed to load document schema: {0}")]
    SchemaLoad(String),

    /// A serialized document does not conform to the schema.
    #[error("Schema validation failed: {}", errors.join("; "))]
    SchemaValidation { errors: Vec<String> },

    /// A document violates a content post-condition (e.g. no permanent articles).
    #[error("Document rejected: {}", errors.join("; "))]
    Postcondition { errors: Vec<String> },

    /// Missing or invalid runtime configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Some documents of a batch run failed.
    #[error("{failed} of {total} documents failed")]
    BatchFailed { failed: usize, total: usize },
}

/// Coarse classification of failures, used by the batch driver for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Empty, undecodable or oversized input. The document is skipped.
    FatalInput,
    /// The extraction service failed or answered with garbage.
    ExternalService,
    /// The document was produced but rejected by schema or post-conditions.
    Validation,
    /// Filesystem, serialization or configuration trouble.
    Environment,
}

impl ParserError {
    /// Classify this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyInput | Self::UndecodableInput { .. } | Self::InputTooLarge { .. } => {
                ErrorCategory::FatalInput
            }
            Self::Http(_)
            | Self::ServiceError { .. }
            | Self::MalformedResponse(_)
            | Self::EmptyResponse
            | Self::RetriesExhausted { .. } => ErrorCategory::ExternalService,
            Self::SchemaValidation { .. }
            | Self::Postcondition { .. }
            | Self::BatchFailed { .. } => ErrorCategory::Validation,
            Self::InvalidDocumentId(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Yaml(_)
            | Self::SchemaLoad(_)
            | Self::Config(_) => ErrorCategory::Environment,
        }
    }
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undecodable_display() {
        let err = ParserError::UndecodableInput {
            path: PathBuf::from("clean_ley.txt"),
            attempted: vec!["utf-8", "latin-1", "windows-1252"],
        };
        assert_eq!(
            err.to_string(),
            "Could not decode clean_ley.txt (tried utf-8, latin-1, windows-1252)"
        );
    }

    #[test]
    fn test_schema_validation_joins_errors() {
        let err = ParserError::SchemaValidation {
            errors: vec!["/Título: null is not a string".into(), "/Capítulos: bad".into()],
        };
        assert!(err.to_string().contains("/Título: null is not a string; /Capítulos: bad"));
    }

    #[test]
    fn test_categories() {
        assert_eq!(ParserError::EmptyInput.category(), ErrorCategory::FatalInput);
        assert_eq!(
            ParserError::EmptyResponse.category(),
            ErrorCategory::ExternalService
        );
        assert_eq!(
            ParserError::Postcondition { errors: vec![] }.category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            ParserError::Config("LLM_API_KEY not set".into()).category(),
            ErrorCategory::Environment
        );
    }
}
