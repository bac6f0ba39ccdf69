//! Final answer extraction at end of stream

use std::sync::OnceLock;

use regex::Regex;

use crate::error::LlmError;
use crate::protocol::google::GoogleResponse;
use crate::segment::StreamState;

/// Trim and remove a leading fenced-block opener and every fence marker
pub fn strip_fences(text: &str) -> String {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    let fence = FENCE.get_or_init(|| Regex::new(r"^```[a-zA-Z0-9]*\n|```").expect("must be valid regex"));
    fence.replace_all(text.trim(), "").trim().to_owned()
}

/// Answer of a chunked stream
///
/// # Errors
///
/// Returns `LlmError::TerminalParse` when the vendor reported an error and no
/// answer arrived, `LlmError::EmptyResult` when the stream carried no answer
/// text (including a stream that only ever produced thinking)
pub fn resolve_stream(state: StreamState) -> Result<String, LlmError> {
    if state.is_thinking() {
        tracing::debug!(thinking_len = state.thinking().len(), "stream ended inside a thinking segment");
    }

    let (answer, vendor_error) = state.into_parts();
    let answer = strip_fences(&answer);
    if !answer.is_empty() {
        return Ok(answer);
    }

    match vendor_error {
        Some(message) => Err(LlmError::TerminalParse(message)),
        None => Err(LlmError::EmptyResult),
    }
}

/// Answer of a whole-document response body
///
/// # Errors
///
/// Returns `LlmError::TerminalParse` if the body is malformed or carries an
/// error object, `LlmError::EmptyResult` if it holds neither text nor error
pub fn resolve_document(body: &[u8]) -> Result<String, LlmError> {
    let response: GoogleResponse = serde_json::from_slice(body)
        .map_err(|e| LlmError::TerminalParse(format!("Gemini response parse error: {e}")))?;

    if let Some(text) = response.first_text().filter(|text| !text.trim().is_empty()) {
        return Ok(strip_fences(text));
    }

    match response.error {
        Some(error) => Err(LlmError::TerminalParse(format!("Gemini API error: {}", error.message()))),
        None => Err(LlmError::EmptyResult),
    }
}
