//! Transport error types.

use std::fmt;

/// Errors from Bot API calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TelegramError {
    /// The HTTP request could not be completed.
    RequestFailed { method: String, reason: String },
    /// The API answered with a non-success status.
    Status { method: String, status: u16, body: String },
    /// The API reported `ok: false`.
    Api { method: String, description: String },
    /// The response body could not be parsed.
    ResponseParseFailed { method: String, reason: String },
    /// Invalid client configuration.
    InvalidConfig { reason: String },
}

impl fmt::Display for TelegramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequestFailed { method, reason } => {
                write!(f, "telegram {method} request failed: {reason}")
            }
            Self::Status {
                method,
                status,
                body,
            } => {
                write!(f, "telegram {method} returned status {status}: {body}")
            }
            Self::Api {
                method,
                description,
            } => {
                write!(f, "telegram {method} rejected: {description}")
            }
            Self::ResponseParseFailed { method, reason } => {
                write!(f, "failed to parse telegram {method} response: {reason}")
            }
            Self::InvalidConfig { reason } => {
                write!(f, "invalid telegram configuration: {reason}")
            }
        }
    }
}

impl std::error::Error for TelegramError {}
