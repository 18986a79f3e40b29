//! Error types for the AI crate.
//!
//! Backends return `LlmError` wrapped in a rootcause `Report`; callers render
//! it at the boundary where a user-facing reply is produced.

use std::fmt;

/// Errors from generation backend operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// The request could not be sent or the connection failed.
    RequestFailed { reason: String },
    /// Timeout waiting for response.
    Timeout,
    /// The backend answered with a non-success status.
    Status { status: u16, body: String },
    /// Response parsing failed.
    ResponseParseFailed { reason: String },
    /// The response parsed but lacks required content.
    MalformedResponse { reason: String },
    /// Invalid configuration.
    InvalidConfig { reason: String },
}

impl LlmError {
    /// Maps a reqwest transport error to the matching variant.
    #[must_use]
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::RequestFailed {
                reason: err.to_string(),
            }
        }
    }
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequestFailed { reason } => {
                write!(f, "generation request failed: {reason}")
            }
            Self::Timeout => write!(f, "generation request timed out"),
            Self::Status { status, body } => {
                write!(f, "generation backend returned status {status}: {body}")
            }
            Self::ResponseParseFailed { reason } => {
                write!(f, "failed to parse generation response: {reason}")
            }
            Self::MalformedResponse { reason } => {
                write!(f, "malformed generation response: {reason}")
            }
            Self::InvalidConfig { reason } => {
                write!(f, "invalid generation backend configuration: {reason}")
            }
        }
    }
}

impl std::error::Error for LlmError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_display() {
        let err = LlmError::Status {
            status: 429,
            body: "slow down".to_string(),
        };
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("slow down"));
    }

    #[test]
    fn timeout_display() {
        assert_eq!(LlmError::Timeout.to_string(), "generation request timed out");
    }
}
