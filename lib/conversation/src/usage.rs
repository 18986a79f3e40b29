//! Process-wide token accounting.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic total of tokens reported by the generation backend.
#[derive(Debug, Default)]
pub struct UsageCounter {
    total: AtomicU64,
}

impl UsageCounter {
    /// Creates a counter starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the tokens reported for one successful call.
    pub fn record(&self, tokens: u64) -> u64 {
        self.total.fetch_add(tokens, Ordering::Relaxed) + tokens
    }

    /// Returns the running total.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }
}
