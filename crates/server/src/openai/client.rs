//! `OpenAI` API client for chat completions.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::config::OpenAiConfig;

use super::error::{ApiErrorResponse, OpenAiError};
use super::types::{ChatMessage, ChatRequest, ChatResponse, ResponseFormat};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// `OpenAI` chat completions client.
#[derive(Clone)]
pub struct OpenAiClient {
    inner: Arc<OpenAiClientInner>,
}

struct OpenAiClientInner {
    client: reqwest::Client,
    model: String,
}

impl OpenAiClient {
    /// Create a new `OpenAI` client.
    ///
    /// # Errors
    ///
    /// Returns error if the API key contains invalid header characters or
    /// the HTTP client fails to build.
    pub fn new(config: &OpenAiConfig) -> Result<Self, OpenAiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let auth_value = format!("Bearer {}", config.api_key.expose_secret());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value)
                .map_err(|e| OpenAiError::Parse(format!("Invalid API key format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(OpenAiClientInner {
                client,
                model: config.model.clone(),
            }),
        })
    }

    /// The configured model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.inner.model
    }

    /// Send a chat request and return the first choice's text.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails, returns an error response,
    /// or produces no choices.
    pub async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String, OpenAiError> {
        self.send_chat(messages, None).await
    }

    /// Send a chat request in JSON mode and return the first choice's text.
    ///
    /// The completion is constrained to a single valid JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails, returns an error response,
    /// or produces no choices.
    pub async fn chat_json(&self, messages: Vec<ChatMessage>) -> Result<String, OpenAiError> {
        self.send_chat(messages, Some(ResponseFormat::JSON_OBJECT))
            .await
    }

    #[instrument(skip(self, messages), fields(model = %self.inner.model))]
    async fn send_chat(
        &self,
        messages: Vec<ChatMessage>,
        response_format: Option<ResponseFormat>,
    ) -> Result<String, OpenAiError> {
        let request = ChatRequest {
            model: self.inner.model.clone(),
            messages,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: Some(0.7),
            response_format,
        };

        let response = self
            .inner
            .client
            .post(OPENAI_API_URL)
            .json(&request)
            .send()
            .await?;

        let parsed = handle_response(response).await?;

        if let Some(usage) = &parsed.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "Chat completion usage"
            );
        }

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| OpenAiError::EmptyCompletion("no choices in response".to_string()))?;

        if let Some(reason) = choice.finish_reason.as_deref()
            && reason != "stop"
        {
            tracing::warn!(finish_reason = reason, "Completion ended early");
        }

        Ok(choice.message.content)
    }
}

/// Handle a chat completions response.
async fn handle_response(response: reqwest::Response) -> Result<ChatResponse, OpenAiError> {
    let status = response.status();

    if status.is_success() {
        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| OpenAiError::Parse(format!("Failed to parse response: {e}")))
    } else {
        Err(handle_error_status(status, response).await)
    }
}

/// Handle an error status code.
async fn handle_error_status(status: reqwest::StatusCode, response: reqwest::Response) -> OpenAiError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        return OpenAiError::RateLimited(retry_after);
    }

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return OpenAiError::Unauthorized("Invalid API key".to_string());
    }

    match response.text().await {
        Ok(body) => {
            if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&body) {
                OpenAiError::Api {
                    error_type: api_error.error.error_type,
                    message: api_error.error.message,
                }
            } else {
                OpenAiError::Api {
                    error_type: "unknown".to_string(),
                    message: body,
                }
            }
        }
        Err(e) => OpenAiError::Http(e),
    }
}

/// Extract a JSON document from a model reply.
///
/// Models sometimes wrap JSON output in a Markdown code fence; strip it so
/// the caller can hand the remainder to `serde_json`.
#[must_use]
pub fn extract_json(reply: &str) -> &str {
    let trimmed = reply.trim();

    let Some(rest) = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
    else {
        return trimmed;
    };

    rest.strip_suffix("```").unwrap_or(rest).trim()
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("model", &self.inner.model)
            .finish_non_exhaustive()
    }
}
