use std::collections::HashMap;
use std::time::Duration;

use arena_core::{SessionId, SessionStore, StoreError, Turn};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::record::{SessionRecord, SessionStats};

/// Process-local session store.
///
/// The map lock is held only for a single operation. Serializing whole turns
/// on one session is the caller's job. A slot exists only once a turn has
/// been appended; reading or clearing an unknown session allocates nothing.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<SessionId, SessionRecord>>,
    max_turns_per_session: Option<usize>,
    idle_ttl: Option<Duration>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        info!("MemorySessionStore initialized");
        Self::default()
    }

    /// Caps how many turns one session may hold. Appends beyond the cap fail
    /// with [`StoreError::CapacityExceeded`] and leave the history untouched.
    #[must_use]
    pub const fn with_max_turns(mut self, limit: Option<usize>) -> Self {
        self.max_turns_per_session = limit;
        self
    }

    /// Sessions untouched for longer than `ttl` are dropped by
    /// [`evict_idle`](Self::evict_idle).
    #[must_use]
    pub const fn with_idle_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.idle_ttl = ttl;
        self
    }

    #[must_use]
    pub const fn idle_ttl(&self) -> Option<Duration> {
        self.idle_ttl
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn stats(&self, session: &SessionId) -> Option<SessionStats> {
        self.sessions.read().await.get(session).map(SessionRecord::stats)
    }

    /// Removes every session idle for longer than the configured TTL and
    /// returns how many were removed. Without a TTL nothing is evicted.
    pub async fn evict_idle(&self) -> usize {
        let Some(ttl) = self.idle_ttl else {
            return 0;
        };
        let Ok(ttl) = chrono::Duration::from_std(ttl) else {
            return 0;
        };
        let cutoff = Utc::now() - ttl;

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|session, record| {
            let keep = record.updated_at > cutoff;
            if !keep {
                debug!(
                    "Evicting idle session {session} (created {}, last active {}, {} turns)",
                    record.created_at,
                    record.updated_at,
                    record.turns.len()
                );
            }
            keep
        });

        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("Evicted {evicted} idle sessions, {} remain", sessions.len());
        }
        evicted
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, session: &SessionId) -> Result<Vec<Turn>, StoreError> {
        Ok(self
            .sessions
            .read()
            .await
            .get(session)
            .map(|record| record.turns.clone())
            .unwrap_or_default())
    }

    async fn append(&self, session: &SessionId, turn: Turn) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().await;
        let record = sessions.entry(*session).or_insert_with(|| {
            debug!("Created session: {session}");
            SessionRecord::new()
        });

        if let Some(limit) = self
            .max_turns_per_session
            .filter(|limit| record.turns.len() >= *limit)
        {
            warn!("Session {session} is full ({limit} turns), rejecting append");
            return Err(StoreError::CapacityExceeded {
                session: *session,
                limit,
            });
        }

        record.push(turn);
        debug!(
            "Appended turn to session {session} ({} turns)",
            record.turns.len()
        );
        Ok(())
    }

    async fn clear(&self, session: &SessionId) -> Result<(), StoreError> {
        if let Some(record) = self.sessions.write().await.get_mut(session) {
            record.clear();
            info!("Cleared session: {session}");
        } else {
            debug!("Clear on unknown session {session}, nothing to do");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::Role;

    #[tokio::test]
    async fn reading_or_clearing_unknown_sessions_allocates_nothing() {
        let store = MemorySessionStore::new();

        for _ in 0..100 {
            let id = SessionId::new();
            assert!(store.get(&id).await.unwrap().is_empty());
            store.clear(&id).await.unwrap();
        }

        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn append_preserves_order_and_is_visible_to_get() {
        let store = MemorySessionStore::new();
        let id = SessionId::new();

        store.append(&id, Turn::user("A")).await.unwrap();
        store.append(&id, Turn::model("r1")).await.unwrap();
        store.append(&id, Turn::user("B")).await.unwrap();

        let history = store.get(&id).await.unwrap();
        let texts: Vec<&str> = history.iter().map(Turn::text).collect();
        assert_eq!(texts, ["A", "r1", "B"]);
        assert_eq!(history[1].role(), Role::Model);
    }

    #[tokio::test]
    async fn clear_then_get_is_empty_and_idempotent() {
        let store = MemorySessionStore::new();
        let id = SessionId::new();
        store.append(&id, Turn::user("A")).await.unwrap();

        store.clear(&id).await.unwrap();
        store.clear(&id).await.unwrap();

        assert!(store.get(&id).await.unwrap().is_empty());
        assert_eq!(store.session_count().await, 1);
    }

    #[tokio::test]
    async fn clear_on_unknown_session_succeeds() {
        let store = MemorySessionStore::new();
        store.clear(&SessionId::new()).await.unwrap();
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let store = MemorySessionStore::new();
        let a = SessionId::new();
        let b = SessionId::new();

        store.append(&a, Turn::user("only in a")).await.unwrap();
        store.clear(&b).await.unwrap();

        assert_eq!(store.get(&a).await.unwrap().len(), 1);
        assert!(store.get(&b).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn capacity_is_reported_not_dropped() {
        let store = MemorySessionStore::new().with_max_turns(Some(2));
        let id = SessionId::new();

        store.append(&id, Turn::user("A")).await.unwrap();
        store.append(&id, Turn::model("r1")).await.unwrap();
        let err = store.append(&id, Turn::user("B")).await.unwrap_err();

        assert!(matches!(err, StoreError::CapacityExceeded { limit: 2, .. }));
        assert_eq!(store.get(&id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn stats_reflect_stored_turns() {
        let store = MemorySessionStore::new();
        let id = SessionId::new();
        assert!(store.stats(&id).await.is_none());

        store.append(&id, Turn::user("A")).await.unwrap();
        let stats = store.stats(&id).await.unwrap();
        assert_eq!(stats.total_turns, 1);
        assert_eq!(stats.user_turns, 1);
    }

    #[tokio::test]
    async fn idle_sessions_are_evicted_and_active_ones_kept() {
        let store = MemorySessionStore::new().with_idle_ttl(Some(Duration::from_millis(50)));
        let stale = SessionId::new();
        let active = SessionId::new();

        store.append(&stale, Turn::user("old")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(120)).await;
        store.append(&active, Turn::user("new")).await.unwrap();

        assert_eq!(store.evict_idle().await, 1);
        assert_eq!(store.session_count().await, 1);
        assert!(store.stats(&stale).await.is_none());
        assert_eq!(store.get(&active).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn without_ttl_nothing_is_evicted() {
        let store = MemorySessionStore::new();
        store.append(&SessionId::new(), Turn::user("A")).await.unwrap();

        assert_eq!(store.evict_idle().await, 0);
        assert_eq!(store.session_count().await, 1);
    }
}
