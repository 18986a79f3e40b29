//! Generation backend primitives for chat-relay.
//!
//! This crate provides:
//!
//! - **Backend contract**: the [`ChatBackend`] trait and its request/response types
//! - **OpenAI client**: a reqwest-based implementation for chat-completions APIs

pub mod backend;
pub mod error;
pub mod openai;

pub use backend::{ChatBackend, ChatRequest, ChatResponse, Choice, Completion, Role, Turn, Usage};
pub use error::LlmError;
pub use openai::{OpenAiClient, OpenAiClientConfig};
