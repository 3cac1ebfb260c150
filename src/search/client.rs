/// Serper search client implementation.
///
/// This module provides `SerperClient` for asynchronous requests to the Serper
/// web-search API, along with the builder and the `SearchProvider` trait the
/// answer pipeline depends on.
use std::time::Duration;

use async_trait::async_trait;

use crate::provider::{ProviderError, resolve_api_key, resolve_setting, validate_url};

/// Default Serper search endpoint.
pub const DEFAULT_SERPER_URL: &str = "https://google.serper.dev/search";

/// Trait for web search operations.
///
/// Enables mocking in unit tests; the production implementation is `SerperClient`.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Searches the web for `query`.
    ///
    /// Returns result links in the provider's ranking order. No deduplication or
    /// rescoring is applied.
    async fn search(&self, query: &str) -> Result<Vec<String>, ProviderError>;
}

/// Builder for constructing `SerperClient` instances.
///
/// # Examples
///
/// ```
/// use rag_search::search::SerperClientBuilder;
///
/// let client = SerperClientBuilder::new()
///     .api_key("test-key")
///     .base_url("http://localhost:9000/search")
///     .build()
///     .expect("Failed to create client");
/// assert_eq!(client.url(), "http://localhost:9000/search");
/// ```
#[derive(Debug, Default)]
pub struct SerperClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
}

impl SerperClientBuilder {
    /// Creates a new `SerperClientBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the full search endpoint URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the API key sent in the `X-API-KEY` header.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Builds the `SerperClient` with the configured settings.
    ///
    /// # Environment Variables
    ///
    /// If `base_url()` was not called, `SERPER_URL` is used, falling back to
    /// `https://google.serper.dev/search`. If `api_key()` was not called,
    /// `SERPER_API_KEY` must be set.
    pub fn build(self) -> Result<SerperClient, ProviderError> {
        let url = resolve_setting(self.base_url, "SERPER_URL", DEFAULT_SERPER_URL);
        validate_url(&url)?;
        let api_key = resolve_api_key(self.api_key, "SERPER_API_KEY")?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(ProviderError::Network)?;

        Ok(SerperClient {
            client,
            url,
            api_key,
        })
    }
}

/// Asynchronous HTTP client for the Serper search API.
///
/// Should be constructed using `SerperClientBuilder`.
pub struct SerperClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl SerperClient {
    /// Returns the search endpoint this client posts to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SearchProvider for SerperClient {
    async fn search(&self, query: &str) -> Result<Vec<String>, ProviderError> {
        let request_body = serde_json::json!({ "q": query });

        let response = self
            .client
            .post(&self.url)
            .header("X-API-KEY", &self.api_key)
            .header("Content-Type", "application/json")
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

        let links = extract_links(&json);
        tracing::debug!(count = links.len(), "search provider returned links");
        Ok(links)
    }
}

/// Extracts the `link` of every `organic` result, preserving order.
///
/// A missing or non-array `organic` field yields no links, as do entries
/// without a string `link`.
pub fn extract_links(json: &serde_json::Value) -> Vec<String> {
    json.get("organic")
        .and_then(|organic| organic.as_array())
        .map(|results| {
            results
                .iter()
                .filter_map(|result| result.get("link").and_then(|l| l.as_str()))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
