use serde_json::{Map, Value};

use crate::config::{UNIDENTIFIED_TITLE, YEAR_MAX, YEAR_MIN};
use crate::error::{ParserError, Result};
use crate::extraction::client::{ExtractionRequest, ExtractionService};
use crate::extraction::fragments::{split_for_extraction, Fragment, FragmentKind};
use crate::extraction::prompt;
use crate::headers::MEXICAN_LAW_REGISTRY;
use crate::types::Document;
use crate::validation::SchemaValidator;

/// Token usage tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

impl TokenUsage {
    pub fn add(&mut self, prompt_tokens: u64, completion_tokens: u64) {
        self.prompt_tokens += prompt_tokens;
        self.completion_tokens += completion_tokens;
    }
}

/// A fragment the service could not turn into JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentFailure {
    /// Position in the fragment list.
    pub index: usize,
    pub kind: FragmentKind,
    pub message: String,
}

/// Result of extracting one document.
#[derive(Debug, Clone)]
pub struct ExtractionReport {
    pub document: Document,
    pub fragments: usize,
    pub failures: Vec<FragmentFailure>,
    pub usage: TokenUsage,
}

/// Structured extraction orchestrator.
///
/// Sends each fragment of a document to the service, merges the partial
/// objects and revalidates the merged document against the JSON schema.
pub struct Extractor<'a, S: ExtractionService> {
    service: &'a S,
    schema_validator: SchemaValidator,
}

impl<'a, S: ExtractionService> Extractor<'a, S> {
    pub fn new(service: &'a S) -> Result<Self> {
        Ok(Self {
            service,
            schema_validator: SchemaValidator::new()?,
        })
    }

    /// Extract a document.
    ///
    /// A failing fragment is recorded in the report and the others still
    /// contribute. The merged document must pass the schema.
    pub fn extract(&self, text: &str, document_id: &str) -> Result<ExtractionReport> {
        if text.trim().is_empty() {
            return Err(ParserError::EmptyInput);
        }

        let fragments = split_for_extraction(text, &MEXICAN_LAW_REGISTRY);
        let system = prompt::build_system_prompt().to_string();

        let mut usage = TokenUsage::default();
        let mut failures = Vec::new();
        let mut parts: Vec<(FragmentKind, Map<String, Value>)> = Vec::new();

        for (index, fragment) in fragments.iter().enumerate() {
            tracing::debug!(document = document_id, index, kind = fragment.kind.as_str(), "Extracting fragment");
            match self.extract_fragment(&system, fragment, document_id, &mut usage) {
                Ok(object) => parts.push((fragment.kind, object)),
                Err(e) => {
                    tracing::error!(
                        document = document_id,
                        index,
                        kind = fragment.kind.as_str(),
                        error = %e,
                        "Fragment extraction failed"
                    );
                    failures.push(FragmentFailure {
                        index,
                        kind: fragment.kind,
                        message: e.to_string(),
                    });
                }
            }
        }

        let merged = assemble(parts);
        self.schema_validator.validate(&merged)?;
        let document: Document = serde_json::from_value(merged)?;

        tracing::info!(
            document = document_id,
            fragments = fragments.len(),
            failures = failures.len(),
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "Extraction finished"
        );

        Ok(ExtractionReport {
            document,
            fragments: fragments.len(),
            failures,
            usage,
        })
    }

    fn extract_fragment(
        &self,
        system: &str,
        fragment: &Fragment,
        document_id: &str,
        usage: &mut TokenUsage,
    ) -> Result<Map<String, Value>> {
        let request = ExtractionRequest {
            system: system.to_string(),
            user: prompt::build_fragment_prompt(fragment, document_id),
        };
        let response = self.service.complete(&request)?;
        usage.add(response.prompt_tokens, response.completion_tokens);

        let json = extract_json_from_response(&response.content);
        match serde_json::from_str::<Value>(&json) {
            Ok(Value::Object(object)) => Ok(object),
            Ok(other) => Err(ParserError::MalformedResponse(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
            Err(e) => Err(ParserError::MalformedResponse(e.to_string())),
        }
    }
}

/// Merge fragment objects into one document value.
///
/// Preamble fields come from the first preamble fragment, chapters are
/// concatenated in fragment order and transitory blocks likewise.
pub fn assemble(parts: Vec<(FragmentKind, Map<String, Value>)>) -> Value {
    let mut preamble = String::new();
    let mut year = Value::Null;
    let mut title: Option<String> = None;
    let mut chapters = Vec::new();
    let mut transitory = Vec::new();
    let mut seen_preamble = false;

    for (kind, mut object) in parts {
        match kind {
            FragmentKind::Preamble if !seen_preamble => {
                seen_preamble = true;
                preamble = take_string(&mut object, "Decreto").unwrap_or_default();
                year = coerce_year(object.remove("Año_publicación"));
                title = take_string(&mut object, "Título").filter(|t| !t.trim().is_empty());
            }
            FragmentKind::Preamble => {}
            FragmentKind::Normative => {
                chapters.extend(take_array(&mut object, "Capítulos").into_iter().map(coerce_permanent_chapter));
            }
            FragmentKind::Transitory => {
                transitory.extend(take_array(&mut object, "Transitorios"));
            }
        }
    }

    serde_json::json!({
        "Decreto": preamble,
        "Año_publicación": year,
        "Título": title.unwrap_or_else(|| UNIDENTIFIED_TITLE.to_string()),
        "Capítulos": chapters,
        "Transitorios": transitory,
    })
}

/// Extract the JSON payload from a response, stripping code fences.
pub fn extract_json_from_response(response: &str) -> String {
    let trimmed = response.trim();

    let blocks = extract_fenced_blocks(trimmed);
    if let Some(block) = blocks.iter().find(|b| b.trim_start().starts_with('{')) {
        return block.trim().to_string();
    }

    trimmed.to_string()
}

/// Extract all fenced code blocks from text.
fn extract_fenced_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut remaining = text;

    while let Some(start) = remaining.find("```") {
        let after_fence = &remaining[start + 3..];
        // Skip optional language identifier on the same line
        let content_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
        let content = &after_fence[content_start..];
        if let Some(end) = content.find("```") {
            blocks.push(content[..end].to_string());
            remaining = &content[end + 3..];
        } else {
            break;
        }
    }

    blocks
}

fn take_string(object: &mut Map<String, Value>, key: &str) -> Option<String> {
    match object.remove(key)? {
        Value::String(s) => Some(s),
        _ => None,
    }
}

fn take_array(object: &mut Map<String, Value>, key: &str) -> Vec<Value> {
    match object.remove(key) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

/// Years arrive as numbers or digit strings; anything out of range is null.
fn coerce_year(value: Option<Value>) -> Value {
    let year = match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    year.filter(|y| (i64::from(YEAR_MIN)..=i64::from(YEAR_MAX)).contains(y))
        .map_or(Value::Null, Value::from)
}

/// Permanent article numbers sometimes arrive as digit strings.
fn coerce_permanent_chapter(mut chapter: Value) -> Value {
    if let Some(articles) = chapter.get_mut("Artículos").and_then(Value::as_array_mut) {
        for article in articles {
            let parsed = article
                .get("Artículo")
                .and_then(Value::as_str)
                .and_then(|s| s.trim().trim_end_matches('.').parse::<u32>().ok());
            if let (Some(number), Some(object)) = (parsed, article.as_object_mut()) {
                object.insert("Artículo".into(), Value::from(number));
            }
        }
    }
    chapter
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::client::test_support::MockExtractionService;
    use crate::types::ArticleNumber;
    use pretty_assertions::assert_eq;

    const TEXT: &str = "DECRETO\nLEY DE PRUEBA\nCAPÍTULO I\nArtículo 1. Uno.\nCAPÍTULO II\nArtículo 2. Dos.\nTRANSITORIOS\nÚnico. Vigor.";

    const PREAMBLE: &str = r#"{"Decreto": "DECRETO", "Año_publicación": "1995", "Título": "LEY DE PRUEBA"}"#;
    const CHAPTER_1: &str = r#"{"Capítulos": [{"Capítulo": "CAPÍTULO I", "Artículos": [{"Artículo": 1, "Texto": "Uno.", "Fracciones": []}]}]}"#;
    const CHAPTER_2: &str = "```json\n{\"Capítulos\": [{\"Capítulo\": \"CAPÍTULO II\", \"Artículos\": [{\"Artículo\": \"2\", \"Texto\": \"Dos.\"}]}]}\n```";
    const TRANSITORY: &str = r#"{"Transitorios": [{"Capítulo": "TRANSITORIOS", "Artículos": [{"Artículo": "Único", "Texto": "Vigor."}]}]}"#;

    #[test]
    fn test_extract_full_document() {
        let service = MockExtractionService::with_responses(vec![PREAMBLE, CHAPTER_1, CHAPTER_2, TRANSITORY]);
        let extractor = Extractor::new(&service).unwrap();
        let report = extractor.extract(TEXT, "ley_de_prueba").unwrap();

        assert!(report.failures.is_empty());
        assert_eq!(report.fragments, 4);
        assert_eq!(report.usage.prompt_tokens, 400);

        let doc = report.document;
        assert_eq!(doc.publication_year, Some(1995));
        assert_eq!(doc.title, "LEY DE PRUEBA");
        assert_eq!(doc.chapters.len(), 2);
        assert_eq!(doc.chapters[1].articles[0].number, ArticleNumber::Permanent(2));
        assert_eq!(
            doc.transitory_chapters[0].articles[0].number,
            ArticleNumber::Transitory("Único".into())
        );

        let requests = service.requests();
        assert_eq!(requests.len(), 4);
        assert!(requests[1].user.contains("CAPÍTULO I"));
        assert!(requests[3].user.contains("Transitorios"));
    }

    #[test]
    fn test_failed_fragment_is_reported() {
        let service = MockExtractionService::new(vec![
            Ok(crate::extraction::client::ExtractionResponse {
                content: PREAMBLE.into(),
                prompt_tokens: 1,
                completion_tokens: 1,
            }),
            Err(ParserError::ServiceError {
                status: 400,
                message: "bad request".into(),
            }),
            Ok(crate::extraction::client::ExtractionResponse {
                content: "no es json".into(),
                prompt_tokens: 1,
                completion_tokens: 1,
            }),
            Ok(crate::extraction::client::ExtractionResponse {
                content: TRANSITORY.into(),
                prompt_tokens: 1,
                completion_tokens: 1,
            }),
        ]);
        let extractor = Extractor::new(&service).unwrap();
        let report = extractor.extract(TEXT, "ley").unwrap();

        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].index, 1);
        assert_eq!(report.failures[1].kind, FragmentKind::Normative);
        assert!(report.document.chapters.is_empty());
        assert_eq!(report.document.transitory_chapters.len(), 1);
    }

    #[test]
    fn test_schema_violation_rejected() {
        let bad = r#"{"Capítulos": [{"Capítulo": "CAPÍTULO I", "Artículos": [{"Artículo": "Primero", "Texto": "x"}]}]}"#;
        let service = MockExtractionService::with_responses(vec![PREAMBLE, bad, CHAPTER_2, TRANSITORY]);
        let extractor = Extractor::new(&service).unwrap();
        let err = extractor.extract(TEXT, "ley").unwrap_err();
        assert!(matches!(err, ParserError::SchemaValidation { .. }));
    }

    #[test]
    fn test_empty_input() {
        let service = MockExtractionService::with_responses(vec![]);
        let extractor = Extractor::new(&service).unwrap();
        assert!(matches!(extractor.extract("  \n", "ley"), Err(ParserError::EmptyInput)));
        assert!(service.requests().is_empty());
    }

    #[test]
    fn test_assemble_defaults() {
        let merged = assemble(Vec::new());
        assert_eq!(merged["Decreto"], "");
        assert_eq!(merged["Año_publicación"], Value::Null);
        assert_eq!(merged["Título"], UNIDENTIFIED_TITLE);
    }

    #[test]
    fn test_coerce_year() {
        assert_eq!(coerce_year(Some(Value::from(2001))), Value::from(2001));
        assert_eq!(coerce_year(Some(Value::from(" 1917 "))), Value::from(1917));
        assert_eq!(coerce_year(Some(Value::from(1850))), Value::Null);
        assert_eq!(coerce_year(None), Value::Null);
    }

    #[test]
    fn test_extract_json_from_response() {
        assert_eq!(extract_json_from_response("{\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(
            extract_json_from_response("Aquí está:\n```json\n{\"a\": 1}\n```\n"),
            "{\"a\": 1}"
        );
    }
}
