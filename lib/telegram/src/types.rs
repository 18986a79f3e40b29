//! Bot API data types.
//!
//! Only the fields the relay reads are modelled; unknown fields are ignored.

use chat_relay_core::{ChatId, MessageId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Envelope every Bot API method answers with.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

/// One entry returned by `getUpdates`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Update {
    /// Monotonic update identifier, used to acknowledge updates.
    pub update_id: i64,
    /// New incoming message, if this update carries one.
    pub message: Option<IncomingMessage>,
}

/// Kind of chat a message was sent in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    /// One-to-one chat with the bot.
    Private,
    /// Basic group.
    Group,
    /// Supergroup.
    Supergroup,
    /// Broadcast channel.
    Channel,
}

/// A Telegram user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    /// User identifier.
    pub id: UserId,
    /// First name, used as the display name.
    pub first_name: Option<String>,
}

/// A Telegram chat.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Chat {
    /// Chat identifier.
    pub id: ChatId,
    /// Chat kind.
    #[serde(rename = "type")]
    pub kind: ChatKind,
    /// Title, for groups, supergroups and channels.
    pub title: Option<String>,
}

/// A message delivered to the bot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IncomingMessage {
    /// Message identifier within the chat.
    pub message_id: MessageId,
    /// Sender; absent for channel posts.
    pub from: Option<User>,
    /// Chat the message belongs to.
    pub chat: Chat,
    /// Unix time the message was sent.
    pub date: i64,
    /// Text content, absent for media messages.
    pub text: Option<String>,
}

impl IncomingMessage {
    /// Returns whether the message came from a one-to-one chat.
    #[must_use]
    pub fn is_private(&self) -> bool {
        self.chat.kind == ChatKind::Private
    }

    /// Returns the sender's first name, if known.
    #[must_use]
    pub fn sender_name(&self) -> Option<&str> {
        self.from.as_ref().and_then(|user| user.first_name.as_deref())
    }

    /// Returns the sender's id, if known.
    #[must_use]
    pub fn sender_id(&self) -> Option<UserId> {
        self.from.as_ref().map(|user| user.id)
    }

    /// Returns the chat title, if any.
    #[must_use]
    pub fn chat_title(&self) -> Option<&str> {
        self.chat.title.as_deref()
    }

    /// Returns when the message was sent.
    #[must_use]
    pub fn sent_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.date, 0)
    }
}

/// Formatting mode for outgoing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseMode {
    /// Legacy Markdown.
    Markdown,
}

/// Parameters of a `sendMessage` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingMessage {
    /// Target chat.
    pub chat_id: ChatId,
    /// Text to send.
    pub text: String,
    /// Message to quote, used in group chats.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_message_id: Option<MessageId>,
    /// Formatting mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
    /// Suppress link previews.
    pub disable_web_page_preview: bool,
    /// Deliver silently.
    pub disable_notification: bool,
}

impl OutgoingMessage {
    /// Creates a plain message with previews and notifications disabled.
    #[must_use]
    pub fn new(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            reply_to_message_id: None,
            parse_mode: None,
            disable_web_page_preview: true,
            disable_notification: true,
        }
    }

    /// Builds the reply to an inbound message.
    ///
    /// Replies are Markdown formatted; in non-private chats they quote the
    /// triggering message.
    #[must_use]
    pub fn reply_to(message: &IncomingMessage, text: impl Into<String>) -> Self {
        let reply = Self::new(message.chat.id, text).with_parse_mode(ParseMode::Markdown);
        if message.is_private() {
            reply
        } else {
            reply.quoting(message.message_id)
        }
    }

    /// Quotes the given message.
    #[must_use]
    pub fn quoting(mut self, message_id: MessageId) -> Self {
        self.reply_to_message_id = Some(message_id);
        self
    }

    /// Sets the formatting mode.
    #[must_use]
    pub fn with_parse_mode(mut self, parse_mode: ParseMode) -> Self {
        self.parse_mode = Some(parse_mode);
        self
    }
}
