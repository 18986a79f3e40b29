//! Polling worker that feeds Telegram messages through the router.

use chat_relay_conversation::{CommandRouter, ConversationService, Identity};
use chat_relay_telegram::{IncomingMessage, OutgoingMessage, TelegramClient, Update};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Delay before polling again after a failed poll.
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Receives updates, routes them and sends replies back.
pub struct Relay {
    client: TelegramClient,
    router: CommandRouter,
    service: Arc<ConversationService>,
    bot_name: String,
    poll_timeout_secs: u64,
}

impl Relay {
    /// Creates a relay for the named bot.
    #[must_use]
    pub fn new(
        client: TelegramClient,
        service: Arc<ConversationService>,
        bot_name: impl Into<String>,
        poll_timeout_secs: u64,
    ) -> Self {
        let bot_name = bot_name.into();
        Self {
            client,
            router: CommandRouter::new(&bot_name),
            service,
            bot_name,
            poll_timeout_secs,
        }
    }

    /// Polls and processes updates until `shutdown` resolves.
    pub async fn run_until<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut offset = 0;

        tracing::info!(bot = %self.bot_name, "listening for messages");
        loop {
            let polled = tokio::select! {
                () = &mut shutdown => break,
                polled = self.client.get_updates(offset, self.poll_timeout_secs) => polled,
            };

            match polled {
                Ok(updates) => offset = self.process_batch(&updates, offset).await,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to poll for updates");
                    tokio::select! {
                        () = &mut shutdown => break,
                        () = tokio::time::sleep(POLL_RETRY_DELAY) => {}
                    }
                }
            }
        }
        tracing::info!("shutting down bot");
    }

    /// Processes a batch in order and returns the next poll offset.
    pub async fn process_batch(&self, updates: &[Update], offset: i64) -> i64 {
        let mut next = offset;
        for update in updates {
            next = next.max(update.update_id + 1);
            if let Some(message) = &update.message {
                self.process_message(message).await;
            }
        }
        next
    }

    /// Routes one message and delivers the reply, if any.
    pub async fn process_message(&self, message: &IncomingMessage) {
        let Some(text) = message.text.as_deref() else {
            return;
        };
        let Some(user_id) = message.sender_id() else {
            tracing::debug!(chat_id = %message.chat.id, "ignoring message without sender");
            return;
        };

        let mut identity = Identity::new(user_id);
        identity.user_name = message.sender_name().map(str::to_string);
        identity.group_name = message.chat_title().map(str::to_string);

        let is_private = message.is_private();
        let route = self.router.route(text, is_private);
        tracing::info!(
            user = identity.user_name.as_deref().unwrap_or("unknown"),
            ?route,
            sent_at = ?message.sent_at(),
            "{text}"
        );

        let Some(reply) = self
            .router
            .dispatch(&self.service, route, &identity, is_private, text)
            .await
        else {
            return;
        };

        tracing::info!(bot = %self.bot_name, "{reply}");
        let outgoing = OutgoingMessage::reply_to(message, reply);
        if let Err(e) = self.client.send_message(&outgoing).await {
            tracing::error!(error = %e, chat_id = %message.chat.id, "failed to deliver reply");
        }
    }
}
