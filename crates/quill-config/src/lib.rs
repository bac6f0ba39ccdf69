#![allow(clippy::must_use_candidate)]

mod env;
pub mod llm;
mod loader;
pub mod prompt;
pub mod telemetry;

use serde::Deserialize;

pub use env::ExpandError;
pub use llm::*;
pub use prompt::*;
pub use telemetry::{LogFormat, TelemetryConfig};

/// Protocol family names accepted in `protocol` fields
pub const KNOWN_PROTOCOLS: &[&str] = &[
    "openai",
    "openai-chat",
    "ollama",
    "ollama-generate",
    "gemini",
    "gemini-generate",
    "anthropic",
    "anthropic-messages",
];

/// Top-level quill configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Provider selection and sampling
    #[serde(default)]
    pub llm: LlmConfig,
    /// Prompt text
    #[serde(default)]
    pub prompt: PromptConfig,
    /// Logging
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
