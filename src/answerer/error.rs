//! Typed failures of the search-and-answer operation.

use thiserror::Error;

use crate::provider::{ErrorKind, ProviderError};

/// Errors returned by the query service's search operation.
///
/// The HTTP layer collapses all of these into one generic response; the
/// variant and its `kind()` are only used for logging and the error-kind header.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request body could not be decoded
    #[error("Malformed request body: {0}")]
    MalformedRequest(#[source] serde_json::Error),

    /// The web-search provider failed
    #[error("Search provider failed: {0}")]
    Search(#[source] ProviderError),

    /// The language-model provider failed
    #[error("Completion provider failed: {0}")]
    Completion(#[source] ProviderError),
}

impl ServiceError {
    /// Returns the coarse kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedRequest(_) => ErrorKind::Parse,
            Self::Search(e) | Self::Completion(e) => e.kind(),
        }
    }

    /// Returns which stage of the pipeline failed.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::MalformedRequest(_) => "request",
            Self::Search(_) => "search",
            Self::Completion(_) => "completion",
        }
    }
}
