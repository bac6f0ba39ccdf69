//! `OpenAI` chat completion API wire format types

use serde::{Deserialize, Serialize};

use super::VendorError;

// -- Request types --

/// `OpenAI` chat completion request
#[derive(Debug, Clone, Serialize)]
pub struct OpenAiRequest {
    /// Model identifier
    pub model: String,
    /// System and user messages
    pub messages: Vec<OpenAiMessage>,
    /// Sampling temperature
    pub temperature: f64,
    /// Nucleus sampling threshold
    pub top_p: f64,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Whether to stream the response
    pub stream: bool,
    /// Provider-specific fixed fields (e.g. `enable_enhancement`)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// `OpenAI` message within a request
#[derive(Debug, Clone, Serialize)]
pub struct OpenAiMessage {
    /// Message role
    pub role: &'static str,
    /// Text content
    pub content: String,
}

// -- Response types --

/// One streamed chunk, or a complete response from a vendor that ignored `stream`
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiStreamChunk {
    /// Completion choices
    #[serde(default)]
    pub choices: Vec<OpenAiChoice>,
    /// Error payload
    #[serde(default)]
    pub error: Option<VendorError>,
}

/// Choice within a chunk
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiChoice {
    /// Incremental delta (streaming)
    #[serde(default)]
    pub delta: Option<OpenAiDelta>,
    /// Full message (non-streaming chat completion)
    #[serde(default)]
    pub message: Option<OpenAiChoiceMessage>,
    /// Full text (legacy completions)
    #[serde(default)]
    pub text: Option<String>,
}

/// Incremental delta
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiDelta {
    /// Answer text
    #[serde(default)]
    pub content: Option<String>,
    /// Reasoning text emitted on a side channel
    #[serde(default)]
    pub reasoning_content: Option<String>,
}

/// Message in a non-streaming choice
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiChoiceMessage {
    /// Message content
    #[serde(default)]
    pub content: Option<OpenAiMessageContent>,
}

/// Message content: a string, an object carrying `parts`, or anything else
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OpenAiMessageContent {
    /// Plain text
    Text(String),
    /// Object with a `parts` array to be joined
    Parts {
        /// Content parts
        parts: Vec<serde_json::Value>,
    },
    /// Unrecognised shape, kept verbatim
    Other(serde_json::Value),
}

impl OpenAiMessageContent {
    /// Flatten the content into a single string
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Parts { parts } => parts
                .into_iter()
                .map(|part| match part {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                })
                .collect(),
            Self::Other(serde_json::Value::Null) => String::new(),
            Self::Other(value) => value.to_string(),
        }
    }
}
