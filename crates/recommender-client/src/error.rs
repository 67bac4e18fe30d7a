//! Error types for recommender API calls.

use thiserror::Error;

/// Failure modes of a single API call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client")]
    HttpClient {
        /// Builder failure.
        source: reqwest::Error,
    },
    /// A request URL could not be assembled from the base URL.
    #[error("invalid request URL for '{path}': {reason}")]
    InvalidUrl {
        /// API path being addressed.
        path: String,
        /// Why the URL could not be built.
        reason: &'static str,
    },
    /// A request header value was rejected.
    #[error("invalid value for header '{name}'")]
    InvalidHeader {
        /// Header name.
        name: &'static str,
    },
    /// The request never produced a response (DNS, connect, TLS, read).
    #[error("request to {path} failed")]
    Network {
        /// API path being addressed.
        path: String,
        /// Transport failure.
        source: reqwest::Error,
    },
    /// The service answered with a non-success status.
    #[error("API request failed with status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },
    /// The body was not JSON or did not match the endpoint schema.
    #[error("error decoding response from {path}")]
    Decode {
        /// API path being addressed.
        path: String,
        /// Deserialisation failure.
        source: serde_json::Error,
    },
    /// Credential material could not be obtained or attached.
    #[error("failed to obtain credentials: {message}")]
    Credentials {
        /// Human-readable description of every failed attempt.
        message: String,
    },
}

impl ClientError {
    pub(crate) fn credentials(message: impl Into<String>) -> Self {
        Self::Credentials {
            message: message.into(),
        }
    }
}

/// Convenience alias for client results.
pub type ClientResult<T> = Result<T, ClientError>;
