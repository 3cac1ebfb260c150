use thiserror::Error;

/// Errors surfaced to the user of the interactive client.
///
/// The `Display` output of each variant is the exact message shown on screen.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The service refused or dropped the connection
    #[error(
        "Connection error: could not connect to the query service at {endpoint}. Make sure it is running."
    )]
    Connection { endpoint: String },

    /// The request did not complete within the request timeout
    #[error(
        "Timeout error: the request took too long to complete. The server might be processing a complex query."
    )]
    Timeout,

    /// The service answered with a non-2xx status
    #[error("Error: {status} - {body}")]
    Status { status: u16, body: String },

    /// The service never passed a liveness probe
    #[error("Could not connect to the query service. Make sure it is running at {endpoint}")]
    Unavailable { endpoint: String },

    /// The supervisor could not start the service
    #[error("Failed to start the query service: {reason}")]
    Launch { reason: String },

    /// A 2xx response whose body is not an answer
    #[error("Error: unexpected response from the query service: {detail}")]
    InvalidResponse { detail: String },

    /// Any other transport failure
    #[error("Error: {detail}")]
    Request { detail: String },

    /// The HTTP client itself could not be constructed
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

impl ClientError {
    /// Classifies a transport-level `reqwest` error.
    pub(crate) fn from_transport(error: reqwest::Error, endpoint: &str) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_connect() {
            Self::Connection {
                endpoint: endpoint.to_string(),
            }
        } else {
            Self::Request {
                detail: error.to_string(),
            }
        }
    }
}
