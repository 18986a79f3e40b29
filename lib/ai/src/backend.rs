//! Generation backend abstraction.
//!
//! Provides the request/response contract of an OpenAI-style chat-completions
//! endpoint and the trait every backend implements.

use crate::error::LlmError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System message.
    System,
    /// User/human message.
    User,
    /// Assistant/AI message.
    Assistant,
}

impl Role {
    /// Returns the wire name of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    /// Parses a role name case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "system" => Ok(Self::System),
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// One message in a conversation.
///
/// Turns are immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    role: Role,
    content: String,
}

impl Turn {
    /// Creates a new turn.
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a system turn.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Creates a user turn.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates an assistant turn.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Returns the role of the sender.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the text content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consumes the turn, returning its content.
    #[must_use]
    pub fn into_content(self) -> String {
        self.content
    }
}

/// A chat-completions request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier.
    pub model: String,
    /// Temperature for sampling.
    pub temperature: f64,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Ordered messages, oldest first.
    pub messages: Vec<Turn>,
}

/// One generated alternative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// The generated message.
    pub message: Turn,
}

/// Token usage reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens spent on the prompt.
    #[serde(default)]
    pub prompt_tokens: u64,
    /// Tokens spent on the completion.
    #[serde(default)]
    pub completion_tokens: u64,
    /// Total tokens billed for the call.
    pub total_tokens: u64,
}

/// A chat-completions response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Generated alternatives, best first.
    pub choices: Vec<Choice>,
    /// Token usage statistics.
    pub usage: Usage,
}

/// The reply text and billed tokens extracted from a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Content of the first choice.
    pub content: String,
    /// Total tokens reported for the call.
    pub total_tokens: u64,
}

impl ChatResponse {
    /// Extracts the first choice's content and the total token usage.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::MalformedResponse`] if the response carries no choices.
    pub fn into_completion(self) -> Result<Completion, LlmError> {
        let total_tokens = self.usage.total_tokens;
        let first = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::MalformedResponse {
                reason: "response contained no choices".to_string(),
            })?;
        Ok(Completion {
            content: first.message.into_content(),
            total_tokens,
        })
    }
}

/// Trait for generation backends.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Sends a composed request and returns the backend's response.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, timeout
    /// or an unparsable payload.
    async fn complete(
        &self,
        request: &ChatRequest,
    ) -> chat_relay_core::Result<ChatResponse, LlmError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("System".parse::<Role>(), Ok(Role::System));
        assert_eq!(" ASSISTANT ".parse::<Role>(), Ok(Role::Assistant));
        assert!("narrator".parse::<Role>().is_err());
    }

    #[test]
    fn request_serializes_in_wire_format() {
        let request = ChatRequest {
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.5,
            max_tokens: 256,
            messages: vec![Turn::system("be brief"), Turn::user("hello")],
        };

        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(json["max_tokens"], 256);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hello");
    }

    #[test]
    fn response_parses_openai_payload() {
        let body = serde_json::json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "hi there"}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 7, "completion_tokens": 3, "total_tokens": 10}
        });

        let response: ChatResponse = serde_json::from_value(body).expect("deserialize");
        let completion = response.into_completion().expect("has a choice");
        assert_eq!(completion.content, "hi there");
        assert_eq!(completion.total_tokens, 10);
    }

    #[test]
    fn empty_choices_is_malformed() {
        let response = ChatResponse {
            choices: Vec::new(),
            usage: Usage::default(),
        };

        let err = response.into_completion().unwrap_err();
        assert!(matches!(err, LlmError::MalformedResponse { .. }));
    }
}
