//! OpenAI chat-completion client.

use async_trait::async_trait;
use docqa_core::{CompletionModel, DocqaError, Message, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// The default base URL for the OpenAI API.
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// The default chat model.
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Configuration for an [`OpenAIChatModel`].
#[derive(Debug, Clone)]
pub struct OpenAIChatConfig {
    /// API key sent as a bearer token.
    pub api_key: String,
    /// Model name (e.g. `gpt-4o-mini`).
    pub model: String,
    /// Base URL; point at any OpenAI-compatible service.
    pub base_url: String,
    /// Sampling temperature. Defaults to 0.0 so the retrieve/direct
    /// decision and the grounded answers stay reproducible.
    pub temperature: f32,
}

impl OpenAIChatConfig {
    /// Create a config with the given key and model.
    ///
    /// # Errors
    ///
    /// Returns [`DocqaError::Config`] if the API key is empty.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(DocqaError::Config("OpenAI API key must not be empty".to_string()));
        }
        Ok(Self {
            api_key,
            model: model.into(),
            base_url: OPENAI_BASE_URL.to_string(),
            temperature: 0.0,
        })
    }

    /// Build a config from `OPENAI_API_KEY` and `OPENAI_MODEL`.
    ///
    /// # Errors
    ///
    /// Returns [`DocqaError::Config`] when `OPENAI_API_KEY` is not set —
    /// the process must not start without a credential.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            DocqaError::Config("OPENAI_API_KEY environment variable not set".to_string())
        })?;
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self::new(api_key, model)
    }

    /// Point the client at an OpenAI-compatible base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// A [`CompletionModel`] backed by the OpenAI chat completions API.
pub struct OpenAIChatModel {
    client: reqwest::Client,
    config: OpenAIChatConfig,
}

impl OpenAIChatModel {
    /// Create a new client from a validated config.
    pub fn new(config: OpenAIChatConfig) -> Self {
        Self { client: reqwest::Client::new(), config }
    }
}

// ── OpenAI API request/response types ──────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
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
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

// ── CompletionModel implementation ─────────────────────────────────

#[async_trait]
impl CompletionModel for OpenAIChatModel {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, messages: &[Message]) -> Result<String> {
        debug!(model = %self.config.model, messages = messages.len(), "chat completion request");

        let request_body = ChatRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "OpenAI", error = %e, "request failed");
                DocqaError::Model {
                    provider: "OpenAI".to_string(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(provider = "OpenAI", %status, "API error");
            return Err(DocqaError::Model {
                provider: "OpenAI".to_string(),
                message: format!("API returned {status}: {detail}"),
            });
        }

        let chat: ChatResponse = response.json().await.map_err(|e| {
            error!(provider = "OpenAI", error = %e, "failed to parse response");
            DocqaError::Model {
                provider: "OpenAI".to_string(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| DocqaError::Model {
                provider: "OpenAI".to_string(),
                message: "response contained no choices".to_string(),
            })?;

        Ok(content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_api_key_is_rejected() {
        let err = OpenAIChatConfig::new("", "gpt-4o-mini").unwrap_err();
        assert!(matches!(err, DocqaError::Config(_)));
    }

    #[test]
    fn temperature_defaults_to_zero() {
        let config = OpenAIChatConfig::new("sk-test", "gpt-4o-mini").unwrap();
        assert_eq!(config.temperature, 0.0);
    }
}
