use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::post::JAPANESE_CHAR_TARGET;

/// User settings from settings.toml. Every field has a default, so a partial
/// file merges over the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Soft per-post budget used by the splitter
    #[serde(default = "default_max_chars_per_post")]
    pub max_chars_per_post: usize,
    /// Prefix posts with `i/N` when a thread has more than one post
    #[serde(default = "default_true")]
    pub include_numbering: bool,
    /// Append ` →` to every post except the last
    #[serde(default = "default_true")]
    pub auto_add_continue: bool,
    #[serde(default)]
    pub llm: LlmConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            max_chars_per_post: default_max_chars_per_post(),
            include_numbering: true,
            auto_add_continue: true,
            llm: LlmConfig::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_chars_per_post() -> usize {
    JAPANESE_CHAR_TARGET
}

/// Summarization provider settings, handed to the injected summarizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: LlmProvider,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        LlmConfig {
            provider: LlmProvider::default(),
            api_key: String::new(),
            model: default_model(),
        }
    }
}

fn default_model() -> String {
    LlmProvider::default().default_model().to_string()
}

impl LlmConfig {
    /// Switch provider, resetting the model to that provider's default.
    pub fn set_provider(&mut self, provider: LlmProvider) {
        self.provider = provider;
        self.model = provider.default_model().to_string();
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    OpenAi,
    #[default]
    Anthropic,
    Gemini,
}

impl LlmProvider {
    pub fn default_model(self) -> &'static str {
        match self {
            LlmProvider::Anthropic => "claude-sonnet-4-20250514",
            LlmProvider::OpenAi => "gpt-4o-mini",
            LlmProvider::Gemini => "gemini-2.0-flash",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "openai",
            LlmProvider::Anthropic => "anthropic",
            LlmProvider::Gemini => "gemini",
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(LlmProvider::OpenAi),
            "anthropic" => Ok(LlmProvider::Anthropic),
            "gemini" => Ok(LlmProvider::Gemini),
            other => Err(format!(
                "unknown provider '{}' (expected openai, anthropic or gemini)",
                other
            )),
        }
    }
}
