//! Wire format types for vendor-specific API protocols
//!
//! Each module contains pure serde structs matching the respective vendor's
//! JSON format. Conversion to and from internal types lives in `convert`.

pub mod anthropic;
pub mod google;
pub mod ollama;
pub mod openai;

use serde::Deserialize;

/// Vendor wire contract shared by one or more named providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter)]
pub enum ProtocolFamily {
    /// `POST /chat/completions`, SSE `data:` framed deltas
    #[strum(to_string = "openai-chat", serialize = "openai")]
    OpenAiChat,
    /// `POST /api/generate`, newline-delimited JSON
    #[strum(to_string = "ollama-generate", serialize = "ollama")]
    OllamaGenerate,
    /// `generateContent`, one JSON document
    #[strum(to_string = "gemini-generate", serialize = "gemini")]
    GeminiGenerate,
    /// `POST /v1/messages`, SSE events
    #[strum(to_string = "anthropic-messages", serialize = "anthropic")]
    AnthropicMessages,
}

impl ProtocolFamily {
    /// Whether responses arrive as incremental records rather than one document
    pub const fn is_chunked(self) -> bool {
        !matches!(self, Self::GeminiGenerate)
    }
}

/// Error object embedded in a vendor response
///
/// Vendors disagree on the shape: `OpenAI`, Gemini and Anthropic send an
/// object with a `message`, Ollama sends a bare string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum VendorError {
    /// Structured error object
    Detailed {
        /// Human-readable message
        #[serde(default)]
        message: Option<String>,
        /// Vendor error type
        #[serde(default, rename = "type")]
        kind: Option<String>,
        /// Vendor status code name
        #[serde(default)]
        status: Option<String>,
    },
    /// Bare error string
    Text(String),
}

impl VendorError {
    /// Best available description of the error
    pub fn message(&self) -> String {
        match self {
            Self::Detailed { message: Some(message), .. } => message.clone(),
            Self::Detailed { kind: Some(kind), .. } | Self::Detailed { status: Some(kind), .. } => kind.clone(),
            Self::Detailed { .. } => "unknown vendor error".to_owned(),
            Self::Text(text) => text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn every_configurable_protocol_name_parses() {
        for name in quill_config::KNOWN_PROTOCOLS {
            assert!(ProtocolFamily::from_str(name).is_ok(), "{name} should parse");
        }
    }

    #[test]
    fn display_names_parse_back() {
        for family in ProtocolFamily::iter() {
            assert_eq!(ProtocolFamily::from_str(&family.to_string()).unwrap(), family);
        }
    }

    #[test]
    fn only_gemini_is_whole_document() {
        let whole: Vec<_> = ProtocolFamily::iter().filter(|f| !f.is_chunked()).collect();
        assert_eq!(whole, [ProtocolFamily::GeminiGenerate]);
    }

    #[test]
    fn vendor_error_shapes() {
        let detailed: VendorError = serde_json::from_str(r#"{"code":429,"message":"quota","status":"RESOURCE_EXHAUSTED"}"#).unwrap();
        assert_eq!(detailed.message(), "quota");

        let typed: VendorError = serde_json::from_str(r#"{"type":"overloaded_error"}"#).unwrap();
        assert_eq!(typed.message(), "overloaded_error");

        let text: VendorError = serde_json::from_str(r#""model 'llama9' not found""#).unwrap();
        assert_eq!(text.message(), "model 'llama9' not found");
    }
}
