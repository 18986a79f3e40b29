//! Conversation service for chat-relay.
//!
//! This crate provides:
//!
//! - **Bounded History**: fixed-capacity rolling context per user
//! - **Context Store**: user → history map with first-contact seeding
//! - **Access Policy**: allow-list authorization over user and group names
//! - **Prompt Composer**: ordered message lists for generation requests
//! - **Conversation Service**: backend calls, token accounting, history updates
//! - **Command Router**: control commands versus free text

pub mod access;
pub mod command;
pub mod context;
pub mod error;
pub mod history;
pub mod message;
pub mod prompt;
pub mod service;
pub mod usage;

pub use access::AccessPolicy;
pub use command::{Command, CommandRouter, Route};
pub use context::{ContextStore, SharedHistory};
pub use error::SeedExampleError;
pub use history::BoundedHistory;
pub use message::{parse_seed_example, parse_seed_examples};
pub use prompt::PromptComposer;
pub use service::{ConversationService, GenerationSettings, Identity, replies};
pub use usage::UsageCounter;

pub use chat_relay_ai::{Role, Turn};
