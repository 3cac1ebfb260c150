/// OpenAI chat-completion client implementation.
///
/// This module provides `OpenAiClient` for making asynchronous requests to a
/// `/chat/completions` endpoint, along with its builder and the
/// `CompletionProvider` trait used by the answer pipeline.
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::provider::{ProviderError, resolve_api_key, resolve_setting, validate_url};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-4.1";

/// Default upper bound on generated tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 300;

/// Trait for chat-completion operations.
///
/// This trait enables mocking in unit tests and provides a clean interface
/// for interacting with the language-model provider.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends a two-message conversation (system + user) and returns the text
    /// of the first choice, untrimmed.
    async fn complete(&self, system: &str, user: &str) -> Result<String, ProviderError>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
}

/// Builder for constructing `OpenAiClient` instances.
///
/// # Examples
///
/// ```
/// use rag_search::llm::OpenAiClientBuilder;
///
/// let client = OpenAiClientBuilder::new()
///     .api_key("test-key")
///     .base_url("http://localhost:9001/v1")
///     .model("gpt-4.1-mini")
///     .build()
///     .expect("Failed to create client");
/// assert_eq!(client.model(), "gpt-4.1-mini");
/// ```
#[derive(Debug, Default)]
pub struct OpenAiClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    max_tokens: Option<u32>,
}

impl OpenAiClientBuilder {
    /// Creates a new `OpenAiClientBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API base URL (the part before `/chat/completions`).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the bearer token.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the model identifier.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the maximum number of generated tokens.
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Builds the `OpenAiClient` with the configured settings.
    ///
    /// # Environment Variables
    ///
    /// Unset builder values fall back to `OPENAI_BASE_URL`, `OPENAI_MODEL`
    /// and `OPENAI_MAX_TOKENS`, then to the defaults (`https://api.openai.com/v1`,
    /// `gpt-4.1`, 300). `OPENAI_API_KEY` is required when `api_key()` was not called.
    /// An unparseable `OPENAI_MAX_TOKENS` is ignored.
    pub fn build(self) -> Result<OpenAiClient, ProviderError> {
        let base_url = resolve_setting(self.base_url, "OPENAI_BASE_URL", DEFAULT_BASE_URL);
        let base_url = base_url.trim_end_matches('/').to_string();
        validate_url(&base_url)?;

        let model = resolve_setting(self.model, "OPENAI_MODEL", DEFAULT_MODEL);
        let max_tokens = self
            .max_tokens
            .or_else(|| {
                std::env::var("OPENAI_MAX_TOKENS")
                    .ok()
                    .and_then(|v| v.trim().parse().ok())
            })
            .unwrap_or(DEFAULT_MAX_TOKENS);
        let api_key = resolve_api_key(self.api_key, "OPENAI_API_KEY")?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(ProviderError::Network)?;

        Ok(OpenAiClient {
            client,
            base_url,
            api_key,
            model,
            max_tokens,
        })
    }
}

/// Asynchronous HTTP client for an OpenAI-compatible chat-completion API.
///
/// Should be constructed using `OpenAiClientBuilder`.
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl OpenAiClient {
    /// Returns the base URL configured for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the model identifier configured for this client.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the generated-token limit sent with each request.
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request_body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(ProviderError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(ProviderError::from_reqwest)?;
        let json: serde_json::Value =
            serde_json::from_slice(&body).map_err(ProviderError::Serialization)?;

        first_choice_text(&json)
    }
}

/// Extracts `choices[0].message.content` from a chat-completion response.
pub fn first_choice_text(json: &serde_json::Value) -> Result<String, ProviderError> {
    let choice = json
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|choices| choices.first())
        .ok_or(ProviderError::MissingField { field: "choices" })?;

    choice
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(str::to_string)
        .ok_or(ProviderError::MissingField {
            field: "choices[0].message.content",
        })
}
