//! Anthropic Messages API wire format types

use serde::{Deserialize, Serialize};

use super::VendorError;

// -- Request types --

/// Anthropic Messages API request
#[derive(Debug, Clone, Serialize)]
pub struct AnthropicRequest {
    /// Model identifier
    pub model: String,
    /// Conversation messages
    pub messages: Vec<AnthropicMessage>,
    /// System prompt
    pub system: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f64,
    /// Whether to stream the response
    pub stream: bool,
}

/// Anthropic message
#[derive(Debug, Clone, Serialize)]
pub struct AnthropicMessage {
    /// Message role
    pub role: &'static str,
    /// Text content
    pub content: String,
}

// -- Stream event types --

/// SSE event payload, tagged by `type`
///
/// Only events that carry text or errors are modelled; the rest collapse
/// into [`AnthropicStreamEvent::Other`].
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnthropicStreamEvent {
    /// Incremental content for a block
    ContentBlockDelta {
        /// Delta payload
        delta: AnthropicStreamDelta,
    },
    /// Error raised mid-stream
    Error {
        /// Error details
        error: VendorError,
    },
    /// `message_start`, `ping`, `message_stop` and friends
    #[serde(other)]
    Other,
}

/// Delta payload within a `content_block_delta` event
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnthropicStreamDelta {
    /// Answer text
    TextDelta {
        /// Text fragment
        text: String,
    },
    /// Extended-thinking text
    ThinkingDelta {
        /// Thinking fragment
        thinking: String,
    },
    /// Tool input JSON and signatures
    #[serde(other)]
    Other,
}
