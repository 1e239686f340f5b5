//! The per-request conversation state machine.

use std::sync::Arc;

use arena_core::{ChatUpstream, SessionId, SessionStore, StoreError, Turn};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::history::HistoryWindow;
use crate::locks::SessionLocks;

/// Errors that end a turn without a model reply.
///
/// Upstream failures are not listed here: they become the model's turn.
#[derive(Debug, Error)]
pub enum ConversationError {
    #[error("Mensagem vazia.")]
    EmptyMessage,

    #[error("Session storage error: {0}")]
    Store(#[from] StoreError),
}

/// Result of one successfully recorded turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    /// The user's text after trimming, as stored.
    pub user_message: String,
    /// The model's reply, or the display string of a classified upstream error.
    pub ai_response: String,
}

/// Orchestrates turns on sessions held by `S`, replying through `U`.
pub struct ConversationController<U = Arc<dyn ChatUpstream>, S = Arc<dyn SessionStore>>
where
    U: Send + Sync,
    S: Send + Sync,
{
    upstream: U,
    store: S,
    window: HistoryWindow,
    locks: SessionLocks,
}

impl<U, S> ConversationController<U, S>
where
    U: ChatUpstream,
    S: SessionStore,
{
    pub fn new(upstream: U, store: S, window: HistoryWindow) -> Self {
        info!(
            "Creating conversation controller (history window: {} turns)",
            window.max_turns()
        );
        Self {
            upstream,
            store,
            window,
            locks: SessionLocks::new(),
        }
    }

    /// Processes one user turn on `session`.
    ///
    /// Blank text is rejected before the session is touched. Otherwise the
    /// user turn and the model turn are both appended, even when the upstream
    /// call fails. A store failure aborts the turn and may leave the user turn
    /// recorded without its reply.
    pub async fn submit_turn(
        &self,
        session: &SessionId,
        text: &str,
    ) -> Result<TurnOutcome, ConversationError> {
        let user_message = text.trim();
        if user_message.is_empty() {
            debug!("Rejected blank message for session {session}");
            return Err(ConversationError::EmptyMessage);
        }

        let _guard = self.locks.acquire(session).await;

        let mut history = self.store.get(session).await?;
        let turn_number = history.len() / 2 + 1;
        info!("Processing turn {turn_number} for session: {session}");

        let user_turn = Turn::user(user_message);
        self.store.append(session, user_turn.clone()).await?;
        history.push(user_turn);

        let view = self.window.select(&history);
        debug!(
            "Sending {} of {} turns upstream for session {session}",
            view.len(),
            history.len()
        );

        let ai_response = match self.upstream.call(view).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(
                    kind = e.kind(),
                    "Upstream failed on turn {turn_number} for session {session}: {e:?}"
                );
                e.to_string()
            }
        };

        self.store
            .append(session, Turn::model(ai_response.clone()))
            .await?;

        debug!("Turn {turn_number} completed for session {session}");
        Ok(TurnOutcome {
            user_message: user_message.to_string(),
            ai_response,
        })
    }

    /// Clears the session's history. Works for sessions never seen before.
    pub async fn reset(&self, session: &SessionId) -> Result<(), ConversationError> {
        let _guard = self.locks.acquire(session).await;
        self.store.clear(session).await?;
        info!("Reset session: {session}");
        Ok(())
    }

    /// Full stored history of `session`.
    pub async fn history(&self, session: &SessionId) -> Result<Vec<Turn>, ConversationError> {
        Ok(self.store.get(session).await?)
    }
}
