//! Fixed-capacity rolling conversation history.

use chat_relay_ai::Turn;
use std::collections::VecDeque;
use tracing::warn;

/// An ordered, bounded sequence of turns.
///
/// Appending beyond capacity evicts the oldest turns, so the history always
/// holds at most `capacity` turns in chronological order. There is no other
/// way to mutate it.
#[derive(Debug, Clone)]
pub struct BoundedHistory {
    turns: VecDeque<Turn>,
    capacity: usize,
}

impl BoundedHistory {
    /// Creates an empty history. A capacity of zero is clamped to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = if capacity == 0 {
            warn!("history capacity of 0 requested, clamping to 1");
            1
        } else {
            capacity
        };
        Self {
            turns: VecDeque::new(),
            capacity,
        }
    }

    /// Appends a turn as the newest entry, evicting the oldest if full.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push_back(turn);
        self.evict();
    }

    /// Appends a batch in order, then evicts down to capacity.
    pub fn append_all<I>(&mut self, turns: I)
    where
        I: IntoIterator<Item = Turn>,
    {
        self.turns.extend(turns);
        self.evict();
    }

    /// Returns the current turns, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.iter().cloned().collect()
    }

    /// Returns the number of stored turns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns whether the history is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Returns the maximum number of retained turns.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn evict(&mut self) {
        let excess = self.turns.len().saturating_sub(self.capacity);
        self.turns.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> Turn {
        Turn::user(format!("message {n}"))
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut history = BoundedHistory::new(0);
        assert_eq!(history.capacity(), 1);

        history.append(numbered(1));
        history.append(numbered(2));
        assert_eq!(history.snapshot(), vec![numbered(2)]);
    }

    #[test]
    fn append_below_capacity_keeps_everything() {
        let mut history = BoundedHistory::new(4);
        history.append(numbered(1));
        history.append(numbered(2));

        assert_eq!(history.snapshot(), vec![numbered(1), numbered(2)]);
    }

    #[test]
    fn retains_most_recent_turns_in_order() {
        for capacity in 1..=6 {
            let mut history = BoundedHistory::new(capacity);
            for n in 0..20 {
                history.append(numbered(n));
                assert!(history.len() <= capacity);

                let first_kept = (n + 1).saturating_sub(capacity);
                let expected: Vec<Turn> = (first_kept..=n).map(numbered).collect();
                assert_eq!(history.snapshot(), expected);
            }
        }
    }

    #[test]
    fn append_all_evicts_after_whole_batch() {
        let mut history = BoundedHistory::new(3);
        history.append(numbered(0));
        history.append_all((1..=3).map(numbered));

        assert_eq!(
            history.snapshot(),
            vec![numbered(1), numbered(2), numbered(3)]
        );
    }

    #[test]
    fn oversized_batch_keeps_its_tail() {
        let mut history = BoundedHistory::new(2);
        history.append_all((0..5).map(numbered));

        assert_eq!(history.snapshot(), vec![numbered(3), numbered(4)]);
    }

    #[test]
    fn snapshot_is_detached_from_history() {
        let mut history = BoundedHistory::new(2);
        history.append(numbered(1));
        let snapshot = history.snapshot();
        history.append(numbered(2));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn huge_capacity_allocates_lazily() {
        let mut history = BoundedHistory::new(usize::MAX);
        history.append(Turn::user("hello"));
        history.append(Turn::assistant("hi"));

        assert_eq!(history.capacity(), usize::MAX);
        assert_eq!(history.len(), 2);
    }
}
