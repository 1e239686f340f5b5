//! HTTP API routes.

use std::sync::Arc;

use arena_conversation::{ConversationController, TurnOutcome};
use arena_core::SessionId;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::cookie::SessionCarrier;
use crate::error::ApiError;

/// Longest accepted message, in characters, before trimming.
pub const MAX_MESSAGE_CHARS: usize = 500;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<ConversationController>,
}

impl AppState {
    #[must_use]
    pub const fn new(controller: Arc<ConversationController>) -> Self {
        Self { controller }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/chat", post(chat))
        .route("/reset", post(reset))
        .route("/limpar-historico", post(reset))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "arena",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatResponse {
    pub user_message: String,
    pub ai_response: String,
    pub status: String,
}

fn validate_length(message: &str) -> Result<(), ApiError> {
    let chars = message.chars().count();
    if (1..=MAX_MESSAGE_CHARS).contains(&chars) {
        Ok(())
    } else {
        Err(ApiError::InvalidRequest(format!(
            "A mensagem deve ter entre 1 e {MAX_MESSAGE_CHARS} caracteres."
        )))
    }
}

async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    validate_length(&request.message)?;

    let carrier = SessionCarrier::from_headers(&headers);
    let outcome = run_turn_detached(&state, carrier.session, request.message).await?;

    let body = ChatResponse {
        user_message: outcome.user_message,
        ai_response: outcome.ai_response,
        status: "success".to_string(),
    };
    Ok(carrier.attach(Json(body).into_response()))
}

/// Runs the turn on its own task so a dropped connection cannot cancel it
/// between the user append and the model append.
async fn run_turn_detached(
    state: &AppState,
    session: SessionId,
    message: String,
) -> Result<TurnOutcome, ApiError> {
    let controller = Arc::clone(&state.controller);
    let task = tokio::spawn(async move { controller.submit_turn(&session, &message).await });

    match task.await {
        Ok(outcome) => Ok(outcome?),
        Err(e) => {
            error!("Turn task for session {session} did not complete: {e}");
            Err(ApiError::Service("Erro interno ao processar a mensagem.".to_string()))
        }
    }
}

async fn reset(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, ApiError> {
    let carrier = SessionCarrier::from_headers(&headers);
    state.controller.reset(&carrier.session).await?;
    info!("History cleared for session {}", carrier.session);

    let body = Json(serde_json::json!({ "status": "ok" }));
    Ok(carrier.attach(body.into_response()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_bounds_are_inclusive() {
        assert!(validate_length("a").is_ok());
        assert!(validate_length(&"a".repeat(MAX_MESSAGE_CHARS)).is_ok());
        assert!(validate_length("").is_err());
        assert!(validate_length(&"a".repeat(MAX_MESSAGE_CHARS + 1)).is_err());
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        assert!(validate_length(&"ç".repeat(MAX_MESSAGE_CHARS)).is_ok());
    }
}
