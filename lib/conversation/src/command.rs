//! Routing of inbound text to commands or conversation.
//!
//! Text starting with `/` is a command; anything else is conversation. A
//! command must be the whole message, optionally addressed as `/cmd@bot`, so
//! `/reset now` is an unknown command. In group chats the bot only answers
//! when its name is mentioned.

use crate::service::{ConversationService, Identity};
use tracing::{debug, warn};

/// Prefix that marks a control command.
pub const COMMAND_PREFIX: char = '/';

/// Recognized control commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Ask the model to introduce itself.
    Start,
    /// Report tokens used since startup.
    Usage,
    /// Drop the sender's stored context.
    Reset,
}

impl Command {
    /// Matches a command token case-insensitively.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_lowercase().as_str() {
            "start" => Some(Self::Start),
            "usage" => Some(Self::Usage),
            "reset" => Some(Self::Reset),
            _ => None,
        }
    }
}

/// What to do with one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Run a control command.
    Command(Command),
    /// Forward the text to the conversation service.
    Converse,
    /// Send nothing back.
    Ignore,
}

/// Decides and executes routes for inbound messages.
#[derive(Debug, Clone)]
pub struct CommandRouter {
    mention: String,
}

impl CommandRouter {
    /// Creates a router for a bot with the given username.
    #[must_use]
    pub fn new(bot_name: &str) -> Self {
        let bot_name = bot_name.trim().trim_start_matches('@');
        Self {
            mention: format!("@{}", bot_name.to_lowercase()),
        }
    }

    /// Classifies a message.
    #[must_use]
    pub fn route(&self, text: &str, is_private: bool) -> Route {
        if let Some(rest) = text.strip_prefix(COMMAND_PREFIX) {
            let token = self.strip_addressee(rest.trim());
            return match Command::parse(token) {
                Some(command) => Route::Command(command),
                None => {
                    warn!(command = %text, "unknown command");
                    Route::Ignore
                }
            };
        }

        if is_private || text.to_lowercase().contains(&self.mention) {
            Route::Converse
        } else {
            debug!("group message not addressed to the bot");
            Route::Ignore
        }
    }

    /// Executes a route and returns the reply to send, if any.
    pub async fn dispatch(
        &self,
        service: &ConversationService,
        route: Route,
        identity: &Identity,
        is_private: bool,
        text: &str,
    ) -> Option<String> {
        match route {
            Route::Command(Command::Start) => Some(service.send_introduction().await),
            Route::Command(Command::Usage) => Some(service.usage_report()),
            Route::Command(Command::Reset) => Some(service.reset_context(identity, is_private)),
            Route::Converse => Some(
                service
                    .handle_user_message(identity, is_private, text)
                    .await,
            ),
            Route::Ignore => None,
        }
    }

    /// Strips a trailing `@botname` from a command token like `/start@mybot`.
    fn strip_addressee<'a>(&self, token: &'a str) -> &'a str {
        match token.split_once('@') {
            Some((command, addressee))
                if format!("@{}", addressee.to_lowercase()) == self.mention =>
            {
                command
            }
            _ => token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextStore;
    use crate::prompt::PromptComposer;
    use crate::service::{GenerationSettings, replies};
    use chat_relay_ai::{ChatBackend, ChatRequest, ChatResponse, Choice, LlmError, Turn, Usage};
    use chat_relay_core::UserId;
    use rootcause::Report;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct EchoBackend {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl ChatBackend for EchoBackend {
        async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, Report<LlmError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let last = request
                .messages
                .last()
                .map(|turn| turn.content().to_string())
                .unwrap_or_default();
            Ok(ChatResponse {
                choices: vec![Choice {
                    message: Turn::assistant(format!("echo: {last}")),
                }],
                usage: Usage {
                    total_tokens: 3,
                    ..Usage::default()
                },
            })
        }
    }

    fn setup() -> (CommandRouter, ConversationService, Arc<EchoBackend>) {
        let backend = Arc::new(EchoBackend {
            calls: AtomicUsize::new(0),
        });
        let service = ConversationService::new(
            Arc::clone(&backend) as Arc<dyn ChatBackend>,
            GenerationSettings {
                model: "test-model".to_string(),
                temperature: 0.0,
                max_tokens: 16,
            },
            PromptComposer::new("SYS", Vec::new()),
            ContextStore::new(8),
        )
        .with_presentation("Introduce yourself");
        (CommandRouter::new("RelayBot"), service, backend)
    }

    async fn handle(
        router: &CommandRouter,
        service: &ConversationService,
        identity: &Identity,
        is_private: bool,
        text: &str,
    ) -> Option<String> {
        let route = router.route(text, is_private);
        router
            .dispatch(service, route, identity, is_private, text)
            .await
    }

    fn alice() -> Identity {
        Identity::new(UserId::new(1)).with_user_name("Alice")
    }

    #[test]
    fn recognizes_commands_case_insensitively() {
        let router = CommandRouter::new("relaybot");
        assert_eq!(router.route("/start", true), Route::Command(Command::Start));
        assert_eq!(router.route("/USAGE", false), Route::Command(Command::Usage));
        assert_eq!(router.route("/Reset", true), Route::Command(Command::Reset));
    }

    #[test]
    fn strips_bot_addressee_from_command() {
        let router = CommandRouter::new("@RelayBot");
        assert_eq!(
            router.route("/start@relaybot", false),
            Route::Command(Command::Start)
        );
        assert_eq!(router.route("/start@otherbot", false), Route::Ignore);
    }

    #[test]
    fn unknown_command_is_ignored() {
        let router = CommandRouter::new("relaybot");
        assert_eq!(router.route("/help", true), Route::Ignore);
        assert_eq!(router.route("/", true), Route::Ignore);
    }

    #[test]
    fn command_with_trailing_text_is_unknown() {
        let router = CommandRouter::new("relaybot");
        assert_eq!(router.route("/reset now", true), Route::Ignore);
        assert_eq!(router.route("/start@relaybot hello", false), Route::Ignore);
        assert_eq!(router.route("/usage ", true), Route::Command(Command::Usage));
    }

    #[test]
    fn private_text_is_conversation() {
        let router = CommandRouter::new("relaybot");
        assert_eq!(router.route("hello there", true), Route::Converse);
    }

    #[test]
    fn group_text_needs_mention() {
        let router = CommandRouter::new("RelayBot");
        assert_eq!(router.route("hello everyone", false), Route::Ignore);
        assert_eq!(router.route("hey @RELAYBOT, hi", false), Route::Converse);
        assert_eq!(router.route("relaybot without at", false), Route::Ignore);
    }

    #[tokio::test]
    async fn start_sends_introduction() {
        let (router, service, backend) = setup();

        let reply = handle(&router, &service, &alice(), true, "/start").await;

        assert_eq!(reply.as_deref(), Some("echo: Introduce yourself"));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn usage_reports_counter() {
        let (router, service, _backend) = setup();
        handle(&router, &service, &alice(), true, "hello").await;

        let reply = handle(&router, &service, &alice(), true, "/usage").await;

        assert_eq!(reply, Some(replies::usage(3)));
    }

    #[tokio::test]
    async fn reset_clears_private_context() {
        let (router, service, _backend) = setup();
        handle(&router, &service, &alice(), true, "hello").await;

        let reply = handle(&router, &service, &alice(), true, "/reset").await;

        assert_eq!(reply, Some(replies::context_reset("Alice")));
        assert!(service.store().is_empty());
    }

    #[tokio::test]
    async fn ignored_group_message_has_no_effect() {
        let (router, service, backend) = setup();
        let member = alice().with_group_name("Chess Club");

        let reply = handle(&router, &service, &member, false, "just chatting").await;

        assert_eq!(reply, None);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        assert_eq!(service.tokens_used(), 0);
    }

    #[tokio::test]
    async fn reset_with_arguments_keeps_context() {
        let (router, service, _backend) = setup();
        handle(&router, &service, &alice(), true, "hello").await;

        let reply = handle(&router, &service, &alice(), true, "/reset now").await;

        assert_eq!(reply, None);
        assert!(service.store().contains(UserId::new(1)));
    }

    #[tokio::test]
    async fn unknown_command_sends_nothing() {
        let (router, service, backend) = setup();

        let reply = handle(&router, &service, &alice(), true, "/weather").await;

        assert_eq!(reply, None);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn mentioned_group_message_is_answered() {
        let (router, service, _backend) = setup();
        let member = alice().with_group_name("Chess Club");

        let reply = handle(&router, &service, &member, false, "@relaybot hi").await;

        assert_eq!(reply.as_deref(), Some("echo: @relaybot hi"));
        assert!(service.store().is_empty());
    }
}
