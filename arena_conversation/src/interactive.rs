use std::io::{BufRead, Write};

use arena_core::{ChatUpstream, SessionId, SessionStore};
use tracing::debug;

use crate::controller::{ConversationController, ConversationError};
use crate::history::HistoryStats;

/// Runs a line-oriented conversation on one session until `exit`, `quit`,
/// `q` or end of input.
///
/// `/reset` clears the session; blank lines are ignored.
pub async fn run_interactive<U, S, R, W>(
    controller: &ConversationController<U, S>,
    session: &SessionId,
    mut input: R,
    mut output: W,
) -> Result<HistoryStats, ConversationError>
where
    U: ChatUpstream,
    S: SessionStore,
    R: BufRead,
    W: Write,
{
    writeln!(output, "=== Sessão de debate: {session} ===").ok();
    writeln!(
        output,
        "Digite 'exit', 'quit' ou Ctrl+C para sair, '/reset' para recomeçar.\n"
    )
    .ok();

    loop {
        write!(output, "> ").ok();
        output.flush().ok();

        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                debug!("Stopping interactive session on read error: {e}");
                break;
            }
        }
        let line = line.trim();

        if matches!(line, "exit" | "quit" | "q") {
            break;
        }
        if line.is_empty() {
            continue;
        }
        if line == "/reset" {
            controller.reset(session).await?;
            writeln!(output, "\n(histórico apagado)\n").ok();
            continue;
        }

        let outcome = controller.submit_turn(session, line).await?;
        writeln!(output, "\n{}\n", outcome.ai_response).ok();
    }

    let stats = HistoryStats::of(&controller.history(session).await?);
    writeln!(output, "\nSessão encerrada. Total de turnos: {}", stats.user_turns).ok();
    Ok(stats)
}
