//! Conversation history windowing.
//!
//! Only the most recent turns are forwarded upstream; the stored history is
//! never shortened.

use arena_core::{DEFAULT_HISTORY_WINDOW, Role, Turn};

/// A sliding window over conversation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryWindow {
    max_turns: usize,
}

impl HistoryWindow {
    #[must_use]
    pub const fn new(max_turns: usize) -> Self {
        Self { max_turns }
    }

    #[must_use]
    pub const fn max_turns(&self) -> usize {
        self.max_turns
    }

    /// The last `max_turns` entries of `history`, in their original order.
    #[must_use]
    pub fn select<'a>(&self, history: &'a [Turn]) -> &'a [Turn] {
        let start = history.len().saturating_sub(self.max_turns);
        &history[start..]
    }
}

impl Default for HistoryWindow {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_WINDOW)
    }
}

/// Statistics about conversation history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStats {
    pub total_turns: usize,
    pub user_turns: usize,
    pub model_turns: usize,
    pub total_characters: usize,
}

impl HistoryStats {
    #[must_use]
    pub fn of(history: &[Turn]) -> Self {
        let user_turns = history.iter().filter(|t| t.role() == Role::User).count();
        Self {
            total_turns: history.len(),
            user_turns,
            model_turns: history.len() - user_turns,
            total_characters: history.iter().map(|t| t.text().chars().count()).sum(),
        }
    }
}
