//! Error types for the conversation crate.
//!
//! Backend failures are carried as `Report<LlmError>` from the AI crate and
//! rendered by the service; this module holds the errors that originate here.

use std::fmt;

/// A configured seed example that could not be turned into a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedExampleError {
    /// No ':' separator between role and content.
    MissingSeparator { example: String },
    /// Role or content is empty after trimming.
    EmptyPart { example: String },
    /// Role is not one of system, user or assistant.
    UnknownRole { example: String, role: String },
}

impl fmt::Display for SeedExampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSeparator { example } => {
                write!(f, "seed example '{example}' has no 'role:content' separator")
            }
            Self::EmptyPart { example } => {
                write!(f, "seed example '{example}' has an empty role or content")
            }
            Self::UnknownRole { example, role } => {
                write!(f, "seed example '{example}' has unknown role '{role}'")
            }
        }
    }
}

impl std::error::Error for SeedExampleError {}
