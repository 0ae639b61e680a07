//! Structured extraction through an external language-model service.
//!
//! An alternative to the rule-based segmenter for texts whose layout the
//! header table cannot follow. The document is split into fragments, each
//! fragment is sent to an OpenAI-compatible chat completions endpoint, and
//! the partial answers are merged and checked against the document schema.

mod client;
mod config;
mod extractor;
mod fragments;
mod prompt;

pub use client::{ChatCompletionsClient, ExtractionRequest, ExtractionResponse, ExtractionService};
#[cfg(any(test, feature = "test-utils"))]
pub use client::test_support::MockExtractionService;
pub use config::{ExtractionConfig, ExtractionConfigBuilder};
pub use extractor::{
    assemble, extract_json_from_response, ExtractionReport, Extractor, FragmentFailure, TokenUsage,
};
pub use fragments::{split_for_extraction, Fragment, FragmentKind};
pub use prompt::{build_fragment_prompt, build_system_prompt};
