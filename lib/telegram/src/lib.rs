//! Telegram Bot API transport for chat-relay.
//!
//! Long-polls `getUpdates` for inbound messages and delivers replies with
//! `sendMessage`. Contains no conversation logic.

mod client;
mod error;
mod types;

pub use client::{TelegramClient, DEFAULT_API_URL};
pub use error::TelegramError;
pub use types::{Chat, ChatKind, IncomingMessage, OutgoingMessage, ParseMode, Update, User};
