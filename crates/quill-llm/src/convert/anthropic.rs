//! Conversion between internal types and Anthropic wire format

use crate::protocol::anthropic::{AnthropicMessage, AnthropicRequest, AnthropicStreamDelta, AnthropicStreamEvent};
use crate::types::{CanonicalRequest, Record};

impl From<&CanonicalRequest> for AnthropicRequest {
    fn from(req: &CanonicalRequest) -> Self {
        Self {
            model: req.model.clone(),
            messages: vec![AnthropicMessage {
                role: "user",
                content: req.user_text.clone(),
            }],
            system: req.system_text.clone(),
            max_tokens: req.sampling.max_tokens,
            temperature: req.sampling.temperature,
            stream: req.streaming,
        }
    }
}

impl AnthropicStreamEvent {
    /// Extract records from one SSE event payload
    pub fn into_records(self) -> Vec<Record> {
        match self {
            Self::ContentBlockDelta { delta } => match delta {
                AnthropicStreamDelta::TextDelta { text } => Record::content(text).into_iter().collect(),
                AnthropicStreamDelta::ThinkingDelta { thinking } => Record::reasoning(thinking).into_iter().collect(),
                AnthropicStreamDelta::Other => Vec::new(),
            },
            Self::Error { error } => vec![Record::VendorError(error.message())],
            Self::Other => Vec::new(),
        }
    }
}
