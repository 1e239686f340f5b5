use std::collections::HashMap;
use std::sync::Arc;

use arena_core::SessionId;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One mutex per session, created on demand.
///
/// Entries nobody holds or waits on are pruned whenever a new lock is handed
/// out, so the registry only grows with the number of active sessions.
#[derive(Debug, Default)]
pub struct SessionLocks {
    locks: Mutex<HashMap<SessionId, Arc<Mutex<()>>>>,
}

/// Exclusive access to one session until dropped.
#[derive(Debug)]
pub struct SessionGuard {
    _guard: OwnedMutexGuard<()>,
}

impl SessionLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, session: &SessionId) -> SessionGuard {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.retain(|id, lock| id == session || Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(*session).or_default())
        };

        SessionGuard {
            _guard: lock.lock_owned().await,
        }
    }

    /// Sessions that currently have a lock entry.
    pub async fn tracked(&self) -> usize {
        self.locks.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn same_session_is_exclusive() {
        let locks = Arc::new(SessionLocks::new());
        let id = SessionId::new();

        let guard = locks.acquire(&id).await;

        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.acquire(&id).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!contender.is_finished());

        drop(guard);
        timeout(Duration::from_secs(1), contender)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn different_sessions_do_not_block() {
        let locks = SessionLocks::new();
        let _a = locks.acquire(&SessionId::new()).await;

        let b = timeout(Duration::from_millis(200), locks.acquire(&SessionId::new())).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn idle_entries_are_pruned() {
        let locks = SessionLocks::new();
        for _ in 0..5 {
            drop(locks.acquire(&SessionId::new()).await);
        }

        let _held = locks.acquire(&SessionId::new()).await;
        assert_eq!(locks.tracked().await, 1);
    }
}
