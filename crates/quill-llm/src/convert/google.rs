//! Conversion between internal types and Google wire format

use crate::protocol::google::{GoogleContent, GooglePart, GoogleRequest, GoogleResponse};
use crate::types::CanonicalRequest;

impl From<&CanonicalRequest> for GoogleRequest {
    fn from(req: &CanonicalRequest) -> Self {
        Self {
            contents: vec![GoogleContent {
                parts: vec![GooglePart {
                    text: format!("{}\n\n{}", req.system_text, req.user_text),
                }],
            }],
        }
    }
}

impl GoogleResponse {
    /// Text of the first part of the first candidate
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }
}
