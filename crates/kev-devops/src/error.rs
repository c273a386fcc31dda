//! Tracking service error types.

use thiserror::Error;

/// Errors raised while talking to the tracking service.
///
/// `Transport` and `Http` abort the whole operation; nothing is retried.
/// `MalformedLink` is recovered locally by the hierarchy resolver.
#[derive(Debug, Error)]
pub enum DevOpsError {
    /// Connection failure, DNS failure, or timeout.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("HTTP error {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body, verbatim.
        body: String,
    },

    /// A response body did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// A relation link whose trailing path segment is not a work item ID.
    #[error("malformed relation link: {0}")]
    MalformedLink(String),
}

impl DevOpsError {
    /// HTTP status code, when the service answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
