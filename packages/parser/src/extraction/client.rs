use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::{ParserError, Result};
use crate::extraction::config::ExtractionConfig;

/// User agent string identifying this parser.
const USER_AGENT: &str = concat!("leyes-parser/", env!("CARGO_PKG_VERSION"));

/// One prompt pair sent to the service.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub system: String,
    pub user: String,
}

/// Raw completion returned by the service.
#[derive(Debug, Clone)]
pub struct ExtractionResponse {
    pub content: String,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

/// Trait for extraction services, enabling mocking in tests.
pub trait ExtractionService: Send + Sync {
    fn complete(&self, request: &ExtractionRequest) -> Result<ExtractionResponse>;
}

/// Client for an OpenAI-compatible chat completions endpoint.
///
/// NOTE: Do NOT derive `Debug` on this struct, `api_key` would be exposed.
pub struct ChatCompletionsClient {
    http: Client,
    api_key: String,
    api_base_url: String,
    model: String,
    temperature: f64,
    max_retries: u32,
    retry_base_delay_ms: u64,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f64,
    response_format: ResponseFormat,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: Option<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl ChatCompletionsClient {
    pub fn new(config: &ExtractionConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_retries: config.max_retries.max(1),
            retry_base_delay_ms: config.retry_base_delay_ms,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.api_base_url)
    }
}

impl ExtractionService for ChatCompletionsClient {
    /// Send one request, retrying transient failures.
    ///
    /// Connection errors, timeouts, 429 and 5xx responses and empty
    /// completions are retried with exponential backoff. Other client errors
    /// fail immediately.
    fn complete(&self, request: &ExtractionRequest) -> Result<ExtractionResponse> {
        let url = self.endpoint();
        let body = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            response_format: ResponseFormat {
                kind: "json_object",
            },
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
        };

        let mut last_error: Option<String> = None;

        for attempt in 0..self.max_retries {
            if attempt > 0 {
                // Exponential backoff: 500ms, 1000ms, 2000ms
                let delay = self.retry_base_delay_ms * (1 << (attempt - 1));
                tracing::debug!(attempt, delay_ms = delay, "Retrying after delay");
                thread::sleep(Duration::from_millis(delay));
            }

            let response = match self
                .http
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
            {
                Ok(response) => response,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    tracing::warn!(
                        error = %e,
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        "Connection error, will retry"
                    );
                    last_error = Some(e.to_string());
                    continue;
                }
                Err(e) => return Err(ParserError::Http(e)),
            };

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                tracing::warn!(
                    status = %status,
                    attempt = attempt + 1,
                    max_retries = self.max_retries,
                    "Service unavailable, will retry"
                );
                last_error = Some(format!("Service error: {status}"));
                continue;
            }

            if !status.is_success() {
                let text = response.text().unwrap_or_default();
                let message = serde_json::from_str::<ErrorResponse>(&text)
                    .ok()
                    .and_then(|r| r.error)
                    .map(|e| e.message)
                    .unwrap_or(text);
                return Err(ParserError::ServiceError {
                    status: status.as_u16(),
                    message,
                });
            }

            let parsed: ChatResponse = response
                .json()
                .map_err(|e| ParserError::MalformedResponse(e.to_string()))?;

            let content = parsed
                .choices
                .into_iter()
                .filter_map(|choice| choice.message.content)
                .collect::<Vec<_>>()
                .join("");

            if content.trim().is_empty() {
                tracing::warn!(attempt = attempt + 1, "Service returned empty completion");
                last_error = Some(ParserError::EmptyResponse.to_string());
                continue;
            }

            let (prompt_tokens, completion_tokens) = parsed
                .usage
                .map(|u| (u.prompt_tokens, u.completion_tokens))
                .unwrap_or_default();

            return Ok(ExtractionResponse {
                content,
                prompt_tokens,
                completion_tokens,
            });
        }

        Err(ParserError::RetriesExhausted {
            attempts: self.max_retries,
            message: last_error.unwrap_or_else(|| "Unknown error".to_string()),
        })
    }
}

/// Test utilities for the extraction service.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_support {
    use super::*;
    use std::sync::Mutex;

    /// Mock service for testing. Returns pre-configured responses in order
    /// and records the requests it received.
    pub struct MockExtractionService {
        responses: Mutex<Vec<Result<ExtractionResponse>>>,
        requests: Mutex<Vec<ExtractionRequest>>,
    }

    impl MockExtractionService {
        pub fn new(responses: Vec<Result<ExtractionResponse>>) -> Self {
            // Reverse so we can pop from the end
            let mut responses = responses;
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn with_responses(contents: Vec<&str>) -> Self {
            Self::new(
                contents
                    .into_iter()
                    .map(|c| {
                        Ok(ExtractionResponse {
                            content: c.to_string(),
                            prompt_tokens: 100,
                            completion_tokens: 200,
                        })
                    })
                    .collect(),
            )
        }

        /// Requests received so far, in order.
        pub fn requests(&self) -> Vec<ExtractionRequest> {
            self.requests.lock().map(|r| r.clone()).unwrap_or_default()
        }
    }

    impl ExtractionService for MockExtractionService {
        fn complete(&self, request: &ExtractionRequest) -> Result<ExtractionResponse> {
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(request.clone());
            }
            let mut responses = self.responses.lock().map_err(|e| {
                ParserError::MalformedResponse(format!("mock lock poisoned: {e}"))
            })?;
            responses.pop().unwrap_or(Err(ParserError::EmptyResponse))
        }
    }
}
