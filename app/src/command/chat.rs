//! Terminal debate on a single session.

use std::io::{self, BufReader};

use arena_conversation::run_interactive;
use arena_core::SessionId;
use tracing::info;

use super::{init_common_components, parse_preset};

/// Input parameters for the Chat command strategy.
#[derive(Debug, Clone, Default)]
pub struct ChatInput {
    /// Optional single message to send (non-interactive mode)
    pub message: Option<String>,
    /// Persona preset (overrides config)
    pub persona: Option<String>,
}

/// Strategy for executing the Chat command.
#[derive(Debug, Clone, Copy)]
pub struct ChatStrategy;

impl super::CommandStrategy for ChatStrategy {
    type Input = ChatInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let preset = parse_preset(input.persona.as_deref())?;
        let common = init_common_components(preset)?;
        let session = SessionId::new();

        info!(
            "Starting debate session: {session} (persona: {})",
            common.persona.name
        );

        if let Some(msg) = input.message {
            let outcome = common.controller.submit_turn(&session, &msg).await?;
            println!("{}", outcome.ai_response);
        } else {
            let stats = run_interactive(
                common.controller.as_ref(),
                &session,
                BufReader::new(io::stdin()),
                io::stdout(),
            )
            .await?;
            info!(
                "Conversation ended: {} turns, {} characters",
                stats.total_turns, stats.total_characters
            );
        }

        Ok(())
    }
}
