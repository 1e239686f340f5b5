#![warn(
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

//! Multi-turn conversation handling on top of a [`SessionStore`] and a
//! [`ChatUpstream`].
//!
//! # Key Features
//! - One full turn (load, append, call, append) per [`ConversationController::submit_turn`]
//! - Bounded view of the history sent upstream, full history kept in the store
//! - Per-session locking so concurrent turns on one session never lose updates
//! - Upstream failures recorded as model turns instead of aborting the turn
//!
//! [`SessionStore`]: arena_core::SessionStore
//! [`ChatUpstream`]: arena_core::ChatUpstream

mod controller;
mod history;
mod interactive;
mod locks;

pub use controller::{ConversationController, ConversationError, TurnOutcome};
pub use history::{HistoryStats, HistoryWindow};
pub use interactive::run_interactive;
pub use locks::{SessionGuard, SessionLocks};
