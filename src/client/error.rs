//! Client error types.

use thiserror::Error;

/// Errors returned by [`ApiClient`](super::ApiClient).
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure or an undecodable body.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Base URL or request path could not be parsed.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The server answered 401. The stored credential has been cleared.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Any other non-success response.
    #[error("api error {status} {code}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Machine-readable error code from the envelope.
        code: String,
        /// Human-readable message.
        message: String,
    },

    /// Credential store I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Credential (de)serialization failure.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// HTTP status carried by the error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized(_) => Some(401),
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
