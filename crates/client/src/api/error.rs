//! API client error type.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors from talking to the marketplace backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed (connection, DNS, runtime timeout).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("backend returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: StatusCode,
        /// Backend-provided message, or a truncated body when none parses.
        message: String,
    },

    /// A 2xx body that does not match the expected shape.
    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// True when the backend rejected the caller's session or credentials.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status == StatusCode::UNAUTHORIZED)
    }
}
