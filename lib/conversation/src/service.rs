//! Conversation orchestration.
//!
//! The service gates access, keeps the per-user rolling context, calls the
//! generation backend and turns every failure into a user-safe reply.

use crate::access::AccessPolicy;
use crate::context::ContextStore;
use crate::prompt::PromptComposer;
use crate::usage::UsageCounter;
use chat_relay_ai::{ChatBackend, ChatRequest, Completion, LlmError, Turn};
use chat_relay_core::{InvocationId, UserId};
use rootcause::Report;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Fixed replies sent back to users.
pub mod replies {
    /// Sent when the allow-list rejects the sender.
    pub const ACCESS_DENIED: &str =
        "Sorry, I can't talk to you, you are not on the access list.";

    /// Sent when the generation backend fails.
    pub const APOLOGY: &str = "Sorry, something went wrong. (This error is being looked into)";

    /// Sent when a reset is requested from a group.
    pub const NOTHING_TO_RESET_IN_GROUP: &str = "Nothing to reset, this is a group.";

    /// Reply after a stored context was dropped.
    #[must_use]
    pub fn context_reset(name: &str) -> String {
        format!("Context has been reset for {name}")
    }

    /// Reply when there was no stored context to drop.
    #[must_use]
    pub fn no_context(name: &str) -> String {
        format!("I found no context for {name}")
    }

    /// Reply to the usage command.
    #[must_use]
    pub fn usage(total_tokens: u64) -> String {
        format!("Token counter: {total_tokens}")
    }
}

/// Model parameters sent with every request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    /// Model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

/// Who sent a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Platform user id, the key for stored context.
    pub user_id: UserId,
    /// Display name of the user, if the platform provided one.
    pub user_name: Option<String>,
    /// Title of the group the message came from, if any.
    pub group_name: Option<String>,
}

impl Identity {
    /// Creates an identity with no names attached.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            user_name: None,
            group_name: None,
        }
    }

    /// Sets the user's display name.
    #[must_use]
    pub fn with_user_name(mut self, name: impl Into<String>) -> Self {
        self.user_name = Some(name.into());
        self
    }

    /// Sets the group title.
    #[must_use]
    pub fn with_group_name(mut self, name: impl Into<String>) -> Self {
        self.group_name = Some(name.into());
        self
    }

    fn display_name(&self) -> String {
        self.user_name
            .clone()
            .unwrap_or_else(|| self.user_id.to_string())
    }
}

/// Orchestrates composition, backend calls, token accounting and history.
pub struct ConversationService {
    backend: Arc<dyn ChatBackend>,
    settings: GenerationSettings,
    composer: PromptComposer,
    store: ContextStore,
    access: AccessPolicy,
    usage: UsageCounter,
    presentation: String,
}

impl ConversationService {
    /// Creates a service with an unrestricted access policy.
    #[must_use]
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        settings: GenerationSettings,
        composer: PromptComposer,
        store: ContextStore,
    ) -> Self {
        Self {
            backend,
            settings,
            composer,
            store,
            access: AccessPolicy::Unrestricted,
            usage: UsageCounter::new(),
            presentation: String::new(),
        }
    }

    /// Sets the access policy.
    #[must_use]
    pub fn with_access(mut self, access: AccessPolicy) -> Self {
        self.access = access;
        self
    }

    /// Sets the text sent to the model when asked to introduce itself.
    #[must_use]
    pub fn with_presentation(mut self, presentation: impl Into<String>) -> Self {
        self.presentation = presentation.into();
        self
    }

    /// Returns the context store.
    #[must_use]
    pub fn store(&self) -> &ContextStore {
        &self.store
    }

    /// Returns the tokens used since startup.
    #[must_use]
    pub fn tokens_used(&self) -> u64 {
        self.usage.total()
    }

    /// Answers a free-text message.
    ///
    /// Private chats keep a rolling context per user; group chats are
    /// answered statelessly. In a private chat the user turn is recorded
    /// before the backend call and stays recorded if the call fails.
    #[instrument(skip(self, text), fields(user_id = %identity.user_id, private = is_private))]
    pub async fn handle_user_message(
        &self,
        identity: &Identity,
        is_private: bool,
        text: &str,
    ) -> String {
        if !self
            .access
            .is_authorized(identity.user_name.as_deref(), identity.group_name.as_deref())
        {
            return replies::ACCESS_DENIED.to_string();
        }

        if !is_private {
            let messages = self.composer.compose_for_group(text);
            return match self.generate(messages).await {
                Ok(completion) => completion.content,
                Err(report) => Self::apologize(&report),
            };
        }

        let history = self
            .store
            .get_or_create(identity.user_id, self.composer.seed_examples());
        let mut history = history.lock().await;
        history.append(Turn::user(text));
        let messages = self.composer.compose_for_conversation(history.snapshot());

        match self.generate(messages).await {
            Ok(completion) => {
                history.append(Turn::assistant(completion.content.clone()));
                completion.content
            }
            Err(report) => Self::apologize(&report),
        }
    }

    /// Asks the model to introduce itself using the presentation text.
    #[instrument(skip(self))]
    pub async fn send_introduction(&self) -> String {
        let messages = self.composer.compose_custom(&self.presentation);
        match self.generate(messages).await {
            Ok(completion) => completion.content,
            Err(report) => Self::apologize(&report),
        }
    }

    /// Drops the user's stored context.
    pub fn reset_context(&self, identity: &Identity, is_private: bool) -> String {
        if !is_private {
            return replies::NOTHING_TO_RESET_IN_GROUP.to_string();
        }

        let name = identity.display_name();
        if self.store.remove(identity.user_id) {
            info!(user_id = %identity.user_id, "conversation context reset");
            replies::context_reset(&name)
        } else {
            replies::no_context(&name)
        }
    }

    /// Reports the tokens used since startup.
    #[must_use]
    pub fn usage_report(&self) -> String {
        replies::usage(self.tokens_used())
    }

    async fn generate(
        &self,
        messages: Vec<Turn>,
    ) -> chat_relay_core::Result<Completion, LlmError> {
        let invocation_id = InvocationId::new();
        let request = ChatRequest {
            model: self.settings.model.clone(),
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
            messages,
        };

        debug!(%invocation_id, messages = request.messages.len(), "calling generation backend");
        let completion = self.backend.complete(&request).await?.into_completion()?;
        let total = self.usage.record(completion.total_tokens);
        debug!(
            %invocation_id,
            tokens = completion.total_tokens,
            total_tokens = total,
            "generation completed"
        );

        Ok(completion)
    }

    fn apologize(report: &Report<LlmError>) -> String {
        error!(error = %report, "generation failed");
        replies::APOLOGY.to_string()
    }
}
