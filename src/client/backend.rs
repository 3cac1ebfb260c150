//! Blocking HTTP access to the query service.

use std::time::Duration;

use tracing::debug;

use crate::answerer::Answer;

use super::error::ClientError;

/// Default liveness probe timeout.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Default timeout for a search round trip.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Operations the client needs from the query service.
///
/// Implemented over HTTP by `HttpBackend`; tests substitute scripted fakes.
pub trait BackendApi: Send {
    /// Returns `true` if `GET /api/health` answers 200 within the probe timeout.
    fn health(&self) -> bool;

    /// Sends `query` to `POST /api/search`.
    fn search(&self, query: &str) -> Result<Answer, ClientError>;

    /// The base URL of the service, used in user-facing messages.
    fn endpoint(&self) -> &str;
}

/// Builder for constructing `HttpBackend` instances.
#[derive(Debug)]
pub struct HttpBackendBuilder {
    endpoint: String,
    probe_timeout: Duration,
    request_timeout: Duration,
}

impl HttpBackendBuilder {
    /// Creates a builder for the service at `endpoint`, e.g. `http://localhost:5000`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Sets the liveness probe timeout.
    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Sets the search request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Builds the `HttpBackend`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::HttpClient` if the underlying client cannot be created.
    pub fn build(self) -> Result<HttpBackend, ClientError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .map_err(ClientError::HttpClient)?;

        Ok(HttpBackend {
            client,
            endpoint: self.endpoint.trim_end_matches('/').to_string(),
            probe_timeout: self.probe_timeout,
        })
    }
}

/// Blocking HTTP client for the query service.
pub struct HttpBackend {
    client: reqwest::blocking::Client,
    endpoint: String,
    probe_timeout: Duration,
}

impl BackendApi for HttpBackend {
    fn health(&self) -> bool {
        let url = format!("{}/api/health", self.endpoint);
        match self.client.get(&url).timeout(self.probe_timeout).send() {
            Ok(response) => response.status().as_u16() == 200,
            Err(e) => {
                debug!("health probe failed: {}", e);
                false
            }
        }
    }

    fn search(&self, query: &str) -> Result<Answer, ClientError> {
        let url = format!("{}/api/search", self.endpoint);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "query": query }))
            .send()
            .map_err(|e| ClientError::from_transport(e, &self.endpoint))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| ClientError::from_transport(e, &self.endpoint))?;

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| ClientError::InvalidResponse {
            detail: e.to_string(),
        })
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
