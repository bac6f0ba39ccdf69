//! Vendor request construction
//!
//! The matched profile's family picks the body shape; its header template
//! supplies the headers, with the credential appended to the template value
//! of the credential header.

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::error::LlmError;
use crate::protocol::ProtocolFamily;
use crate::protocol::anthropic::AnthropicRequest;
use crate::protocol::google::GoogleRequest;
use crate::protocol::ollama::OllamaRequest;
use crate::protocol::openai::OpenAiRequest;
use crate::provider::ProviderProfile;
use crate::types::CanonicalRequest;

/// Family-specific request body
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RequestBody {
    /// Chat completions body
    OpenAi(OpenAiRequest),
    /// Generate body
    Ollama(OllamaRequest),
    /// `generateContent` body
    Google(GoogleRequest),
    /// Messages body
    Anthropic(AnthropicRequest),
}

impl RequestBody {
    /// Shape `req` for `profile`
    pub fn new(req: &CanonicalRequest, profile: &ProviderProfile) -> Self {
        match profile.family {
            ProtocolFamily::OpenAiChat => {
                let mut body = OpenAiRequest::from(req);
                body.extra.clone_from(&profile.extra_body);
                Self::OpenAi(body)
            }
            ProtocolFamily::OllamaGenerate => Self::Ollama(OllamaRequest::from(req)),
            ProtocolFamily::GeminiGenerate => Self::Google(GoogleRequest::from(req)),
            ProtocolFamily::AnthropicMessages => Self::Anthropic(AnthropicRequest::from(req)),
        }
    }

    /// Serialized JSON body
    ///
    /// # Errors
    ///
    /// Returns `LlmError::InvalidRequest` if serialization fails
    pub fn to_bytes(&self) -> Result<Bytes, LlmError> {
        serde_json::to_vec(self)
            .map(Bytes::from)
            .map_err(|e| LlmError::InvalidRequest(format!("failed to serialize request body: {e}")))
    }
}

/// Body and headers ready for the transport
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    /// Request body
    pub body: RequestBody,
    /// Request headers
    pub headers: HeaderMap,
}

/// Build the body and headers for `req` against `profile`
///
/// A credential is sent only when the profile declares a credential header.
///
/// # Errors
///
/// Returns `LlmError::InvalidRequest` if a header name or value cannot be
/// encoded
pub fn build_request(
    req: &CanonicalRequest,
    profile: &ProviderProfile,
    credential: Option<&SecretString>,
) -> Result<PreparedRequest, LlmError> {
    let mut headers = HeaderMap::with_capacity(profile.headers.len());
    for (name, value) in &profile.headers {
        headers.insert(header_name(name)?, header_value(name, value)?);
    }

    let credential = credential.filter(|secret| !secret.expose_secret().is_empty());
    match (&profile.credential_header, credential) {
        (Some(name), Some(secret)) => {
            let name = header_name(name)?;
            let template = headers
                .get(&name)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default();
            let mut value = header_value(name.as_str(), &format!("{template}{}", secret.expose_secret()))?;
            value.set_sensitive(true);
            headers.insert(name, value);
        }
        (None, Some(_)) => {
            tracing::debug!(provider = %profile.name, "provider declares no credential header, credential not sent");
        }
        _ => {}
    }

    Ok(PreparedRequest {
        body: RequestBody::new(req, profile),
        headers,
    })
}

fn header_name(name: &str) -> Result<HeaderName, LlmError> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|e| LlmError::InvalidRequest(format!("invalid header name '{name}': {e}")))
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, LlmError> {
    HeaderValue::from_str(value).map_err(|e| LlmError::InvalidRequest(format!("invalid value for header '{name}': {e}")))
}
