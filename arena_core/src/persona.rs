use serde::{Deserialize, Serialize};

/// Number of most recent turns forwarded upstream when a persona does not
/// say otherwise.
pub const DEFAULT_HISTORY_WINDOW: usize = 20;

/// Sampling parameters sent as `generationConfig` on every call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            top_k: 30,
        }
    }
}

/// The behaviour unit injected into every upstream call.
///
/// The instruction is sent as the first `user` content entry and is never
/// stored in a session's history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Persona {
    pub name: String,
    pub instruction: String,
    /// Maximum number of history turns sent upstream (K).
    #[serde(default = "Persona::default_history_window")]
    pub history_window: usize,
    #[serde(default)]
    pub generation: GenerationConfig,
}

impl Persona {
    const fn default_history_window() -> usize {
        DEFAULT_HISTORY_WINDOW
    }
}
