use arena_core::{Role, Turn};
use chrono::{DateTime, Utc};

/// Stored state of one session.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub turns: Vec<Turn>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionRecord {
    #[must_use]
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            turns: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
        self.updated_at = Utc::now();
    }

    pub fn clear(&mut self) {
        self.turns.clear();
        self.updated_at = Utc::now();
    }

    #[must_use]
    pub fn stats(&self) -> SessionStats {
        let user_turns = self
            .turns
            .iter()
            .filter(|t| t.role() == Role::User)
            .count();
        SessionStats {
            total_turns: self.turns.len(),
            user_turns,
            model_turns: self.turns.len() - user_turns,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl Default for SessionRecord {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStats {
    pub total_turns: usize,
    pub user_turns: usize,
    pub model_turns: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_count_turns_by_role() {
        let mut record = SessionRecord::new();
        record.push(Turn::user("A"));
        record.push(Turn::model("r1"));
        record.push(Turn::user("B"));

        let stats = record.stats();
        assert_eq!(stats.total_turns, 3);
        assert_eq!(stats.user_turns, 2);
        assert_eq!(stats.model_turns, 1);
        assert!(stats.updated_at >= stats.created_at);
    }

    #[test]
    fn clear_keeps_creation_time() {
        let mut record = SessionRecord::new();
        let created = record.created_at;
        record.push(Turn::user("A"));
        record.clear();

        assert!(record.turns.is_empty());
        assert_eq!(record.created_at, created);
    }
}
