//! Errors shared by the outbound provider clients.
//!
//! Both the search client and the completion client report failures through
//! `ProviderError`. Every variant maps onto one of three coarse `ErrorKind`s,
//! which is what the service logs and exposes to callers.

use std::fmt;

use thiserror::Error;

/// Errors that can occur when talking to an external provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network-related errors (connection failures, DNS resolution, etc.)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Request or response timeout errors
    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    /// Non-2xx response from the provider
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// Response body was not valid JSON
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Response was valid JSON but lacked a field we need
    #[error("Missing field in provider response: {field}")]
    MissingField { field: &'static str },

    /// Invalid URL configuration error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Required API key was neither configured nor present in the environment
    #[error("Missing API key: set {var}")]
    MissingApiKey { var: &'static str },
}

/// Coarse classification of a failure, safe to expose to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request never got a usable HTTP exchange (refused, reset, timed out)
    Transport,
    /// The provider answered, but refused or failed the request
    Provider,
    /// Some payload could not be understood
    Parse,
}

impl ErrorKind {
    /// Stable lowercase name, used in logs and the `X-Error-Kind` header.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Provider => "provider",
            Self::Parse => "parse",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ProviderError {
    /// Classifies a transport-level reqwest failure.
    pub fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error)
        } else {
            Self::Network(error)
        }
    }

    /// Returns the coarse kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) | Self::Timeout(_) => ErrorKind::Transport,
            Self::Http { .. } | Self::InvalidUrl(_) | Self::MissingApiKey { .. } => {
                ErrorKind::Provider
            }
            Self::Serialization(_) | Self::MissingField { .. } => ErrorKind::Parse,
        }
    }
}

/// Resolves a setting: explicit value, then environment variable, then default.
pub(crate) fn resolve_setting(explicit: Option<String>, var: &str, default: &str) -> String {
    explicit
        .or_else(|| std::env::var(var).ok().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| default.to_string())
}

/// Resolves a required secret: explicit value, then environment variable.
pub(crate) fn resolve_api_key(
    explicit: Option<String>,
    var: &'static str,
) -> Result<String, ProviderError> {
    explicit
        .or_else(|| std::env::var(var).ok())
        .filter(|key| !key.trim().is_empty())
        .ok_or(ProviderError::MissingApiKey { var })
}

/// Validates that `url` parses as an absolute URL.
pub(crate) fn validate_url(url: &str) -> Result<(), ProviderError> {
    reqwest::Url::parse(url)
        .map(|_| ())
        .map_err(|e| ProviderError::InvalidUrl(format!("{}: {}", url, e)))
}
