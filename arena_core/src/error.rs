//! Error taxonomy shared by the adapter, the store and the controller.
//!
//! `UpstreamError`'s `Display` output is what the user sees as the model's
//! turn, so the messages are written in the product's language.

use thiserror::Error;

use crate::SessionId;

/// Classified failure of one upstream completion call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpstreamError {
    /// No credential configured. Raised before any network attempt.
    #[error("Erro interno: API Key não configurada.")]
    Configuration,

    #[error("A IA demorou muito para responder. Tente novamente.")]
    Timeout,

    /// Connection-level failure; the payload is the transport's own message
    /// and is only used for logging.
    #[error("Erro de comunicação com a IA.")]
    Transport(String),

    #[error("Erro da API Gemini: {0}")]
    HttpStatus(u16),

    /// Success status but the body lacked `candidates[0].content.parts[0].text`.
    #[error("Erro ao processar resposta da IA.")]
    MalformedResponse(String),
}

impl UpstreamError {
    /// Short machine-friendly name, used in structured log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Timeout => "timeout",
            Self::Transport(_) => "transport",
            Self::HttpStatus(_) => "http_status",
            Self::MalformedResponse(_) => "malformed_response",
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Session {session} reached its capacity of {limit} turns")]
    CapacityExceeded { session: SessionId, limit: usize },

    #[error("Session storage unavailable: {0}")]
    Unavailable(String),
}
