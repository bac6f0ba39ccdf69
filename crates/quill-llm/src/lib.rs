//! Streaming completion adapter for quill
//!
//! Resolves a provider endpoint, shapes the vendor request for its protocol
//! family, and reduces the streamed response (with inline `<think>` segments
//! and stray code fences) to a single commit-message answer.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod adapter;
pub mod completion;
pub mod convert;
pub mod demux;
pub mod endpoint;
pub mod error;
pub mod live;
pub mod prompt;
pub mod protocol;
pub mod provider;
pub mod request;
pub mod segment;
pub mod transport;
pub mod types;

pub use adapter::{CompletionAdapter, Invocation};
pub use endpoint::{EndpointResolver, ResolvedEndpoint};
pub use error::{Failure, FailureKind, LlmError};
pub use live::LiveOutput;
pub use prompt::PromptTemplate;
pub use protocol::ProtocolFamily;
pub use provider::{ProviderProfile, ProviderRegistry};
pub use segment::{SegmentUpdate, StreamState};
pub use transport::{HttpTransport, Transport};
pub use types::SamplingParams;
