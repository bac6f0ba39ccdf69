//! Ollama generate API wire format types

use serde::{Deserialize, Serialize};

use super::VendorError;

/// Ollama `/api/generate` request
#[derive(Debug, Clone, Serialize)]
pub struct OllamaRequest {
    /// Model tag
    pub model: String,
    /// System instruction
    pub system: String,
    /// User prompt
    pub prompt: String,
    /// Sampling temperature
    pub temperature: f64,
    /// Nucleus sampling threshold
    pub top_p: f64,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Whether to stream the response
    pub stream: bool,
}

/// One newline-delimited record of a generate stream
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaChunk {
    /// Generated text fragment
    #[serde(default)]
    pub response: Option<String>,
    /// Reasoning fragment from thinking-capable models
    #[serde(default)]
    pub thinking: Option<String>,
    /// Error string
    #[serde(default)]
    pub error: Option<VendorError>,
}
