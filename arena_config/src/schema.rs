use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use arena_core::Persona;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::persona::PersonaPreset;

/// Environment variable holding the Gemini credential.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const HOST_ENV: &str = "ARENA_HOST";
pub const PORT_ENV: &str = "ARENA_PORT";

/// Every section has defaults, so a missing config file is not an error.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub persona: PersonaConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    #[serde(default = "ServerConfig::default_host")]
    pub host: String,
    #[serde(default = "ServerConfig::default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

impl ServerConfig {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    const fn default_port() -> u16 {
        8000
    }

    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "UpstreamConfig::default_base_url")]
    pub base_url: String,
    #[serde(default = "UpstreamConfig::default_model")]
    pub model: String,
    #[serde(default = "UpstreamConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: Self::default_base_url(),
            model: Self::default_model(),
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

impl UpstreamConfig {
    fn default_base_url() -> String {
        "https://generativelanguage.googleapis.com/v1beta".to_string()
    }

    fn default_model() -> String {
        "gemini-2.5-flash".to_string()
    }

    const fn default_timeout_secs() -> u64 {
        30
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The key with all but its first and last four characters hidden.
    #[must_use]
    pub fn masked_api_key(&self) -> String {
        match self.api_key.as_deref().map(str::trim) {
            None | Some("") => "(not set)".to_string(),
            Some(key) if key.chars().count() > 8 => {
                let head: String = key.chars().take(4).collect();
                let tail: String = key.chars().skip(key.chars().count() - 4).collect();
                format!("{head}...{tail}")
            }
            Some(_) => "***".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct PersonaConfig {
    #[serde(default)]
    pub preset: PersonaPreset,
    /// Takes precedence over `preset` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<Persona>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_turns_per_session: Option<usize>,
    /// Seconds without activity before a session is dropped. 0 keeps sessions forever.
    #[serde(default = "SessionConfig::default_idle_ttl_secs")]
    pub idle_ttl_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_turns_per_session: None,
            idle_ttl_secs: Self::default_idle_ttl_secs(),
        }
    }
}

impl SessionConfig {
    const fn default_idle_ttl_secs() -> u64 {
        3600
    }

    #[must_use]
    pub const fn idle_ttl(&self) -> Option<Duration> {
        match self.idle_ttl_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

impl Config {
    /// Loads `~/arena/config.json` (if present), then `.env`, then applies
    /// environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            info!("Loaded environment from {}", path.display());
        }

        let config_path = Self::config_path()?;
        let mut config = if config_path.exists() {
            info!("Loading config from {}", config_path.display());
            Self::load_from(&config_path)?
        } else {
            info!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            Self::default()
        };

        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Applies `GEMINI_API_KEY`, `ARENA_HOST` and `ARENA_PORT` from `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.upstream.api_key = Some(key);
        }
        if let Some(host) = lookup(HOST_ENV) {
            self.server.host = host;
        }
        if let Some(port) = lookup(PORT_ENV) {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("{PORT_ENV} must be a port number, got '{port}'"))?;
        }

        if self.upstream.api_key.is_none() {
            warn!(
                "{API_KEY_ENV} is not set: every chat turn will reply with a configuration error"
            );
        }
        Ok(())
    }

    /// The persona to run with. An explicit preset wins over the config file.
    #[must_use]
    pub fn persona(&self, preset_override: Option<PersonaPreset>) -> Persona {
        match (preset_override, &self.persona.custom) {
            (Some(preset), _) => preset.persona(),
            (None, Some(custom)) => custom.clone(),
            (None, None) => self.persona.preset.persona(),
        }
    }

    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    fn config_dir() -> anyhow::Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?
            .join("arena"))
    }

    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    /// Writes the default config template to `path`. Refuses to overwrite.
    pub fn write_template(path: &Path) -> anyhow::Result<()> {
        if path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                path.display()
            );
        }

        let config_template = r#"{
  "server": {
    "host": "0.0.0.0",
    "port": 8000
  },
  "upstream": {
    "api_key": "your-gemini-api-key-here",
    "model": "gemini-2.5-flash",
    "timeout_secs": 30
  },
  "persona": {
    "preset": "open_minded"
  },
  "session": {
    "idle_ttl_secs": 3600
  }
}"#;

        std::fs::write(path, config_template)?;
        Ok(())
    }

    pub fn create_config() -> anyhow::Result<()> {
        let config_path = Self::ensure_config_dir()?.join("config.json");
        Self::write_template(&config_path)?;

        println!("✅ Created config file at: {}", config_path.display());
        println!();
        println!("📝 Next steps:");
        println!("   1. Put your Gemini API key in the config file or in {API_KEY_ENV}");
        println!("   2. Run 'arena serve' to start the HTTP service");
        println!("   3. Or run 'arena chat' to debate from the terminal");
        println!();
        println!("🔧 Configuration options:");
        println!("   - persona.preset: classic or open_minded");
        println!(
            "   - persona.custom: your own instruction, history_window and generation settings"
        );
        println!("   - session.max_turns_per_session: cap on stored turns per session");
        println!("   - session.idle_ttl_secs: drop sessions idle this long (0 = never)");
        println!();
        Ok(())
    }
}
