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

//! HTTP surface of the debate service.

mod cookie;
mod error;
mod routes;

pub use cookie::{SESSION_COOKIE, SessionCarrier};
pub use error::ApiError;
pub use routes::{AppState, ChatRequest, ChatResponse, MAX_MESSAGE_CHARS, build_router};

use tokio::net::TcpListener;
use tracing::info;

/// Binds `address` and serves the router until the process is stopped.
pub async fn serve(address: &str, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(address).await?;
    info!("Starting HTTP server on {}", listener.local_addr()?);
    axum::serve(listener, build_router(state)).await
}
