use std::fmt;
use std::str::FromStr;

use arena_core::{DEFAULT_HISTORY_WINDOW, GenerationConfig, Persona};
use serde::{Deserialize, Serialize};

const CLASSIC_INSTRUCTION: &str = include_str!("personas/classic.txt");
const OPEN_MINDED_INSTRUCTION: &str = include_str!("personas/open_minded.txt");

/// Built-in debater personas.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PersonaPreset {
    /// Long-form, stubborn debater: concedes only after at least four replies.
    Classic,
    /// Shorter replies, openly persuadable after three to five good arguments.
    #[default]
    OpenMinded,
}

impl PersonaPreset {
    #[must_use]
    pub fn persona(self) -> Persona {
        match self {
            Self::Classic => Persona {
                name: self.to_string(),
                instruction: CLASSIC_INSTRUCTION.trim().to_string(),
                history_window: DEFAULT_HISTORY_WINDOW,
                generation: GenerationConfig {
                    temperature: 0.8,
                    top_p: 0.95,
                    top_k: 40,
                },
            },
            Self::OpenMinded => Persona {
                name: self.to_string(),
                instruction: OPEN_MINDED_INSTRUCTION.trim().to_string(),
                history_window: DEFAULT_HISTORY_WINDOW,
                generation: GenerationConfig {
                    temperature: 0.7,
                    top_p: 0.9,
                    top_k: 30,
                },
            },
        }
    }
}

impl fmt::Display for PersonaPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Classic => f.write_str("classic"),
            Self::OpenMinded => f.write_str("open_minded"),
        }
    }
}

impl FromStr for PersonaPreset {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "classic" => Ok(Self::Classic),
            "open_minded" => Ok(Self::OpenMinded),
            other => {
                anyhow::bail!("Unknown persona preset '{other}' (expected classic or open_minded)")
            }
        }
    }
}
