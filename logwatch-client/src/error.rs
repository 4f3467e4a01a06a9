//! Error types for the API client.

use thiserror::Error;

/// Message used when neither the server nor the transport said anything useful.
pub const FALLBACK_MESSAGE: &str = "Request failed";

/// Errors that can occur when calling the backend.
///
/// `Display` output is the user-facing message: server-reported failures
/// are shown verbatim, everything else gets a short generic description.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The caller cancelled the request. Not a real failure.
    #[error("canceled")]
    Cancelled,

    /// The per-client timeout elapsed before a response arrived.
    #[error("Request timed out")]
    Timeout,

    /// Could not reach the backend.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Transport-level failure other than connect or timeout.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Non-2xx response without a server message.
    #[error("Request failed with status code {0}")]
    Status(u16),

    /// The server reported a failure, either through a non-2xx response
    /// carrying an envelope or through `success: false`.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The request could not be built.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Whether this error only records a cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }

    /// Build a server failure, falling back to [`FALLBACK_MESSAGE`] for a
    /// blank message.
    pub fn server(status: u16, message: Option<&str>) -> Self {
        let message = message
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(FALLBACK_MESSAGE);
        ApiError::Server {
            status,
            message: message.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::Connection(err.to_string())
        } else if err.is_decode() {
            ApiError::Parse(err.to_string())
        } else if err.is_builder() {
            ApiError::InvalidRequest(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Status(status.as_u16())
        } else {
            ApiError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Parse(err.to_string())
    }
}
