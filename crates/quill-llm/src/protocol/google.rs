//! Google Generative Language API wire format types

use serde::{Deserialize, Serialize};

use super::VendorError;

// -- Request types --

/// Google `generateContent` request
#[derive(Debug, Clone, Serialize)]
pub struct GoogleRequest {
    /// Conversation contents
    pub contents: Vec<GoogleContent>,
}

/// Content object containing parts
#[derive(Debug, Clone, Serialize)]
pub struct GoogleContent {
    /// Content parts
    pub parts: Vec<GooglePart>,
}

/// Text part
#[derive(Debug, Clone, Serialize)]
pub struct GooglePart {
    /// Text content
    pub text: String,
}

// -- Response types --

/// Google `generateContent` response document
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleResponse {
    /// Response candidates
    #[serde(default)]
    pub candidates: Vec<GoogleCandidate>,
    /// Error payload
    #[serde(default)]
    pub error: Option<VendorError>,
}

/// Individual response candidate
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleCandidate {
    /// Generated content
    #[serde(default)]
    pub content: Option<GoogleCandidateContent>,
}

/// Content of a candidate
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleCandidateContent {
    /// Content parts
    #[serde(default)]
    pub parts: Vec<GoogleResponsePart>,
}

/// Response part; non-text parts carry no `text`
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleResponsePart {
    /// Text content
    #[serde(default)]
    pub text: Option<String>,
}
