use std::sync::Arc;
use std::time::Duration;

use arena_server::AppState;
use arena_session::MemorySessionStore;
use tracing::info;

use super::{init_common_components, parse_preset};

/// Input for the `serve` command.
#[derive(Debug, Clone, Default)]
pub struct ServeInput {
    /// Listen host (overrides config)
    pub host: Option<String>,
    /// Listen port (overrides config)
    pub port: Option<u16>,
    /// Persona preset (overrides config)
    pub persona: Option<String>,
}

/// Strategy for running the HTTP service.
#[derive(Debug, Clone, Copy)]
pub struct ServeStrategy;

impl super::CommandStrategy for ServeStrategy {
    type Input = ServeInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let preset = parse_preset(input.persona.as_deref())?;
        let mut common = init_common_components(preset)?;

        if let Some(host) = input.host {
            common.config.server.host = host;
        }
        if let Some(port) = input.port {
            common.config.server.port = port;
        }

        info!(
            "Debate Arena v{} serving persona '{}'",
            env!("CARGO_PKG_VERSION"),
            common.persona.name
        );

        if let Some(ttl) = common.store.idle_ttl() {
            info!("Sessions idle for {}s are evicted", ttl.as_secs());
            tokio::spawn(sweep_idle_sessions(Arc::clone(&common.store), ttl));
        }

        let state = AppState::new(common.controller);
        arena_server::serve(&common.config.server.address(), state).await?;
        Ok(())
    }
}

/// Longest pause between two eviction sweeps.
const MAX_SWEEP_PERIOD: Duration = Duration::from_secs(60);

async fn sweep_idle_sessions(store: Arc<MemorySessionStore>, ttl: Duration) {
    let mut ticker = tokio::time::interval(ttl.min(MAX_SWEEP_PERIOD));
    loop {
        ticker.tick().await;
        store.evict_idle().await;
    }
}
