use arena_config::Config;

/// Strategy for displaying the effective configuration, with the API key
/// masked.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;
        let persona = config.persona(None);

        println!("=== arena Configuration ===\n");

        println!("Config file: {}", Config::config_path()?.display());
        println!();

        println!("Server:");
        println!("  Address: {}", config.server.address());
        println!();

        println!("Upstream:");
        println!("  API Key: {}", config.upstream.masked_api_key());
        println!("  Base URL: {}", config.upstream.base_url);
        println!("  Model: {}", config.upstream.model);
        println!("  Timeout: {}s", config.upstream.timeout_secs);
        println!();

        println!("Persona:");
        println!("  Name: {}", persona.name);
        println!("  Instruction: {}", truncate(&persona.instruction, 60));
        println!("  History Window: {} turns", persona.history_window);
        println!("  Temperature: {}", persona.generation.temperature);
        println!("  Top P: {}", persona.generation.top_p);
        println!("  Top K: {}", persona.generation.top_k);
        println!();

        println!("Sessions:");
        match config.session.max_turns_per_session {
            Some(limit) => println!("  Max Turns Per Session: {limit}"),
            None => println!("  Max Turns Per Session: (unbounded)"),
        }
        match config.session.idle_ttl() {
            Some(ttl) => println!("  Idle TTL: {}s", ttl.as_secs()),
            None => println!("  Idle TTL: (never evicted)"),
        }

        Ok(())
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{head}...")
    }
}
