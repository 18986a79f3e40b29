//! Core domain types and utilities for chat-relay.
//!
//! This crate provides the identifiers and error handling foundation shared
//! by the conversation, generation and transport crates.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{ChatId, InvocationId, MessageId, ParseIdError, UserId};
