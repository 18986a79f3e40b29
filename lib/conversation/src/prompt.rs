//! Composition of generation requests.
//!
//! Private chats are sent with their rolling history; group chats are
//! stateless and get the seed examples on every message.

use chat_relay_ai::Turn;

/// Builds ordered message lists around a fixed system prompt.
#[derive(Debug, Clone)]
pub struct PromptComposer {
    system_prompt: String,
    seed_examples: Vec<Turn>,
}

impl PromptComposer {
    /// Creates a composer from the system prompt and parsed seed examples.
    #[must_use]
    pub fn new(system_prompt: impl Into<String>, seed_examples: Vec<Turn>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            seed_examples,
        }
    }

    /// Returns the seed examples, in configured order.
    #[must_use]
    pub fn seed_examples(&self) -> &[Turn] {
        &self.seed_examples
    }

    /// Private path: `[system] + history`.
    ///
    /// The history already contains the seed examples (from first contact)
    /// and the user turn being answered.
    #[must_use]
    pub fn compose_for_conversation(&self, history: Vec<Turn>) -> Vec<Turn> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(self.system_turn());
        messages.extend(history);
        messages
    }

    /// Private path when the new text is not yet part of the history:
    /// `[system] + history + [user]`.
    #[must_use]
    pub fn compose_with_new_turn(&self, history: Vec<Turn>, new_user_text: &str) -> Vec<Turn> {
        let mut messages = self.compose_for_conversation(history);
        messages.push(Turn::user(new_user_text));
        messages
    }

    /// Group path: `[system] + seed examples + [user]`.
    #[must_use]
    pub fn compose_for_group(&self, new_user_text: &str) -> Vec<Turn> {
        let mut messages = Vec::with_capacity(self.seed_examples.len() + 2);
        messages.push(self.system_turn());
        messages.extend(self.seed_examples.iter().cloned());
        messages.push(Turn::user(new_user_text));
        messages
    }

    /// Introduction path: `[system, user(presentation)]`.
    #[must_use]
    pub fn compose_custom(&self, presentation_text: &str) -> Vec<Turn> {
        vec![self.system_turn(), Turn::user(presentation_text)]
    }

    fn system_turn(&self) -> Turn {
        Turn::system(self.system_prompt.clone())
    }
}
