//! Groq model definitions.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Groq models (OpenAI-compatible API).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString)]
pub enum GroqModel {
    #[strum(serialize = "llama-3.3-70b-versatile")]
    Llama3370bVersatile,
    #[strum(serialize = "llama-3.1-8b-instant")]
    Llama318bInstant,
    #[strum(serialize = "mixtral-8x7b-32768")]
    Mixtral8x7b,
    #[strum(default)]
    Custom(String),
}

impl GroqModel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Llama3370bVersatile => "llama-3.3-70b-versatile",
            Self::Llama318bInstant => "llama-3.1-8b-instant",
            Self::Mixtral8x7b => "mixtral-8x7b-32768",
            Self::Custom(s) => s,
        }
    }
}

impl Default for GroqModel {
    fn default() -> Self {
        Self::Llama318bInstant
    }
}
