//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy type with its own input, dispatched
//! statically from `main`.

use std::sync::Arc;

use arena_config::{Config, PersonaPreset};
use arena_conversation::{ConversationController, HistoryWindow};
use arena_core::{ChatUpstream, Persona, SessionStore};
use arena_providers::GeminiProvider;
use arena_session::MemorySessionStore;
use tracing::info;

mod chat;
mod info;
mod init;
mod serve;
mod version;

pub use chat::{ChatInput, ChatStrategy};
pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use serve::{ServeInput, ServeStrategy};
pub use version::VersionStrategy;

/// Core trait defining the contract for all command strategies.
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

/// Components shared by the commands that hold conversations.
struct CommonComponents {
    config: Config,
    persona: Persona,
    controller: Arc<ConversationController>,
    store: Arc<MemorySessionStore>,
}

/// Loads the config and wires the Gemini adapter, the session store and the
/// controller together.
fn init_common_components(preset: Option<PersonaPreset>) -> anyhow::Result<CommonComponents> {
    let config = Config::load()?;
    let persona = config.persona(preset);
    info!(
        "Using persona '{}' (history window {}, temperature {}, topP {}, topK {})",
        persona.name,
        persona.history_window,
        persona.generation.temperature,
        persona.generation.top_p,
        persona.generation.top_k
    );

    let upstream: Arc<dyn ChatUpstream> = Arc::new(
        GeminiProvider::new(config.upstream.api_key.clone(), persona.clone())
            .with_base_url(config.upstream.base_url.clone())
            .with_model(config.upstream.model.clone())
            .with_timeout(config.upstream.timeout()),
    );
    let store = Arc::new(
        MemorySessionStore::new()
            .with_max_turns(config.session.max_turns_per_session)
            .with_idle_ttl(config.session.idle_ttl()),
    );

    let controller = Arc::new(ConversationController::new(
        upstream,
        Arc::clone(&store) as Arc<dyn SessionStore>,
        HistoryWindow::new(persona.history_window),
    ));

    Ok(CommonComponents {
        config,
        persona,
        controller,
        store,
    })
}

fn parse_preset(name: Option<&str>) -> anyhow::Result<Option<PersonaPreset>> {
    name.map(str::parse).transpose()
}
