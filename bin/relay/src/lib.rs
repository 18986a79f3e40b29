//! chat-relay bot.
//!
//! Wires the Telegram transport, the conversation service and the
//! OpenAI-compatible backend together.

pub mod config;
pub mod relay;
