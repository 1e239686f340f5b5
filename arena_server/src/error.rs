//! Error types for the HTTP surface.

use arena_conversation::ConversationError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

/// Failures surfaced to HTTP clients as `{"detail": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Message blank after trimming.
    #[error("{0}")]
    Validation(String),

    /// Body missing, not JSON, or message outside the allowed length.
    #[error("{0}")]
    InvalidRequest(String),

    /// Session storage failed mid-turn.
    #[error("{0}")]
    Service(String),
}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Service(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ConversationError> for ApiError {
    fn from(err: ConversationError) -> Self {
        match err {
            ConversationError::EmptyMessage => Self::Validation(err.to_string()),
            ConversationError::Store(_) => {
                error!("Conversation turn failed: {err}");
                Self::Service(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "detail": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::StoreError;

    #[test]
    fn empty_message_is_a_client_error() {
        let err = ApiError::from(ConversationError::EmptyMessage);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Mensagem vazia.");
    }

    #[test]
    fn store_failure_is_a_server_error() {
        let err = ApiError::from(ConversationError::Store(StoreError::Unavailable(
            "gone".into(),
        )));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
