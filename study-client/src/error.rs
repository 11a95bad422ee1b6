//! Error types for the request client and services.

use crate::transport::TransportError;
use thiserror::Error;

/// Errors surfaced to screens by the services and the request client.
///
/// Every request either resolves with a 2xx response or rejects with one of
/// these; nothing in the client swallows an error silently.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network failure - no response was received.
    #[error("network error: {0}")]
    Transport(#[from] TransportError),

    /// The server answered with a non-2xx status.
    #[error("{api} failed: {status} {status_text}")]
    Status {
        /// Originating API name (e.g. "documents.list").
        api: &'static str,
        /// Numeric HTTP status.
        status: u16,
        /// Status reason phrase, when known.
        status_text: String,
    },

    /// The server answered 401. The session has already been cleared and
    /// the unauthorized hook fired by the time this reaches the caller.
    #[error("unauthorized")]
    Unauthorized,

    /// A 2xx response body did not decode as the expected type.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// Device storage failed while persisting session state.
    #[error("storage error: {0}")]
    Storage(String),
}

impl ClientError {
    /// Whether a retry decorator may re-issue the request.
    ///
    /// Network failures and 5xx are retryable; 4xx never is.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
