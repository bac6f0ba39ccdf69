//! Conversion between internal canonical types and wire formats
//!
//! Requests flow out through `From<&CanonicalRequest>`; parsed response
//! records flow back in as [`Record`](crate::types::Record) lists.

pub mod anthropic;
pub mod google;
pub mod ollama;
pub mod openai;
