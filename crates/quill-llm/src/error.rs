use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Errors that end a completion invocation
///
/// Malformed records inside a chunked stream are not represented here: the
/// demultiplexer logs and drops them without failing the invocation.
#[derive(Debug, Error)]
pub enum LlmError {
    /// No provider profile matches the endpoint host or declared protocol
    #[error("unresolved endpoint: {0}")]
    Resolution(String),

    /// Connection or socket failure while talking to the vendor
    #[error("API request error: {0}")]
    Transport(String),

    /// The terminal document is malformed or carries a vendor error
    #[error("{0}")]
    TerminalParse(String),

    /// The stream ended without any answer-channel text
    #[error("no valid response data received")]
    EmptyResult,

    /// A caller-supplied value cannot be encoded into the vendor request
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl LlmError {
    /// Machine-readable failure kind
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Resolution(_) => FailureKind::ResolutionError,
            Self::Transport(_) => FailureKind::TransportError,
            Self::TerminalParse(_) => FailureKind::TerminalParseError,
            Self::EmptyResult => FailureKind::EmptyResultError,
            Self::InvalidRequest(_) => FailureKind::InvalidRequestError,
        }
    }
}

/// Stable identifiers for [`LlmError`] variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display, strum::IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
    /// See [`LlmError::Resolution`]
    ResolutionError,
    /// See [`LlmError::Transport`]
    TransportError,
    /// See [`LlmError::TerminalParse`]
    TerminalParseError,
    /// See [`LlmError::EmptyResult`]
    EmptyResultError,
    /// See [`LlmError::InvalidRequest`]
    InvalidRequestError,
}

/// Structured failure handed to callers
///
/// Callers are expected to fall back to a local heuristic on any failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    /// Failure category
    pub kind: FailureKind,
    /// Human-readable detail, including any vendor message
    pub message: String,
}

impl From<LlmError> for Failure {
    fn from(error: LlmError) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}
