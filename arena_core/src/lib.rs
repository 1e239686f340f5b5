#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

pub mod error;
pub mod persona;

pub use error::{StoreError, UpstreamError};
pub use persona::{DEFAULT_HISTORY_WINDOW, GenerationConfig, Persona};

/// Author of a turn. Serialized with the same lowercase names the
/// completion API uses for `contents[].role`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("user"),
            Self::Model => f.write_str("model"),
        }
    }
}

/// One message of a conversation. Fields are private so a turn cannot be
/// edited after it has been recorded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Turn {
    role: Role,
    text: String,
}

impl Turn {
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }

    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Opaque session token carried by the client between requests.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for SessionId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// A completion backend that turns a (already truncated) history into the
/// next model reply.
#[async_trait]
pub trait ChatUpstream: Send + Sync {
    async fn call(&self, history: &[Turn]) -> Result<String, UpstreamError>;
}

/// Owner of every session's history.
///
/// After `append` or `clear` returns `Ok`, a subsequent `get` for the same
/// session observes the change.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the session's history, creating an empty one for new sessions.
    async fn get(&self, session: &SessionId) -> Result<Vec<Turn>, StoreError>;
    async fn append(&self, session: &SessionId, turn: Turn) -> Result<(), StoreError>;
    /// Resets the history to empty. Idempotent.
    async fn clear(&self, session: &SessionId) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: ChatUpstream + ?Sized> ChatUpstream for Arc<T> {
    async fn call(&self, history: &[Turn]) -> Result<String, UpstreamError> {
        (**self).call(history).await
    }
}

#[async_trait]
impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    async fn get(&self, session: &SessionId) -> Result<Vec<Turn>, StoreError> {
        (**self).get(session).await
    }

    async fn append(&self, session: &SessionId, turn: Turn) -> Result<(), StoreError> {
        (**self).append(session, turn).await
    }

    async fn clear(&self, session: &SessionId) -> Result<(), StoreError> {
        (**self).clear(session).await
    }
}
