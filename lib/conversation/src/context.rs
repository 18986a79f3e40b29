//! Per-user conversation context store.
//!
//! Context is memory resident only and lives until the process exits or the
//! user asks for a reset.

use crate::history::BoundedHistory;
use chat_relay_ai::Turn;
use chat_relay_core::UserId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// A user's history behind an async lock.
///
/// Holding the lock across a backend call serializes turns for that user.
pub type SharedHistory = Arc<tokio::sync::Mutex<BoundedHistory>>;

/// Maps users to their rolling history.
#[derive(Debug)]
pub struct ContextStore {
    capacity: usize,
    entries: Mutex<HashMap<UserId, SharedHistory>>,
}

impl ContextStore {
    /// Creates an empty store whose histories hold `capacity` turns.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the user's history, creating and seeding it on first contact.
    ///
    /// Seeds are applied only when the entry is created; an existing entry is
    /// returned unchanged.
    pub fn get_or_create(&self, user_id: UserId, seed_turns: &[Turn]) -> SharedHistory {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .entry(user_id)
            .or_insert_with(|| {
                debug!(%user_id, seeds = seed_turns.len(), "creating conversation context");
                let mut history = BoundedHistory::new(self.capacity);
                if !seed_turns.is_empty() {
                    history.append_all(seed_turns.iter().cloned());
                }
                Arc::new(tokio::sync::Mutex::new(history))
            })
            .clone()
    }

    /// Removes the user's history. Returns whether an entry existed.
    pub fn remove(&self, user_id: UserId) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(&user_id).is_some()
    }

    /// Returns whether the user has a stored history.
    #[must_use]
    pub fn contains(&self, user_id: UserId) -> bool {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.contains_key(&user_id)
    }

    /// Returns the number of users with a stored history.
    #[must_use]
    pub fn len(&self) -> usize {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.len()
    }

    /// Returns whether no user has a stored history.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
