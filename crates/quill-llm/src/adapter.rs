//! Invocation orchestration
//!
//! One call to [`CompletionAdapter::complete`] resolves the endpoint, builds
//! the vendor request, opens the transport and drives the response through
//! the demultiplexer and segment classifier until a final answer or failure.

use std::sync::Arc;

use futures_util::StreamExt;
use indexmap::IndexMap;
use quill_config::{Config, ProviderOverride};
use secrecy::SecretString;

use crate::completion::{resolve_document, resolve_stream};
use crate::demux::{Demultiplexer, Flush};
use crate::endpoint::{EndpointResolver, Resolution};
use crate::error::LlmError;
use crate::live::LiveOutput;
use crate::prompt::PromptTemplate;
use crate::protocol::ProtocolFamily;
use crate::provider::{ProviderRegistry, parse_family};
use crate::request::build_request;
use crate::segment::StreamState;
use crate::transport::{ChunkStream, Transport, TransportRequest};
use crate::types::{CanonicalRequest, SamplingParams};

/// Caller-supplied inputs for one completion
///
/// Unset fields fall back to configuration, then to the provider preset.
#[derive(Debug, Default)]
pub struct Invocation {
    /// Change text substituted for `${diff}`
    pub prompt_text: String,
    /// Changed paths substituted for `${files}`
    pub files: Vec<String>,
    /// Provider name
    pub provider: Option<String>,
    /// Credential for the provider's credential header
    pub credential: Option<SecretString>,
    /// Endpoint URL
    pub endpoint: Option<String>,
    /// Protocol family name
    pub protocol: Option<String>,
    /// Model identifier
    pub model: Option<String>,
    /// Sampling parameters
    pub sampling: Option<SamplingParams>,
}

/// Turns invocations into final commit-message text
pub struct CompletionAdapter {
    registry: ProviderRegistry,
    provider: String,
    overrides: IndexMap<String, ProviderOverride>,
    sampling: SamplingParams,
    prompt: PromptTemplate,
    transport: Arc<dyn Transport>,
}

impl CompletionAdapter {
    /// Adapter over `transport` configured from `config`
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Resolution` if a provider override names an
    /// unknown protocol
    pub fn from_config(config: &Config, transport: Arc<dyn Transport>) -> Result<Self, LlmError> {
        Ok(Self {
            registry: ProviderRegistry::from_config(&config.llm)?,
            provider: config.llm.provider.clone(),
            overrides: config.llm.providers.clone(),
            sampling: SamplingParams::from(&config.llm),
            prompt: PromptTemplate::from(&config.prompt),
            transport,
        })
    }

    /// Run one completion, publishing live snapshots to `live`
    ///
    /// # Errors
    ///
    /// Returns the first fatal [`LlmError`] of the invocation; nothing is
    /// retried
    pub async fn complete(&self, invocation: Invocation, live: &LiveOutput) -> Result<String, LlmError> {
        let name = invocation.provider.as_deref().unwrap_or(&self.provider);
        let selected = self
            .registry
            .get(name)
            .ok_or_else(|| {
                let known = self.registry.names().collect::<Vec<_>>().join(", ");
                LlmError::Resolution(format!("unknown provider '{name}' (expected one of {known})"))
            })?;
        let settings = self.overrides.get(name);

        let declared = match invocation
            .protocol
            .as_deref()
            .or_else(|| settings.and_then(|s| s.protocol.as_deref()))
        {
            Some(protocol) => parse_family(name, protocol)?,
            None => selected.family,
        };
        let raw_endpoint = invocation
            .endpoint
            .as_deref()
            .or_else(|| settings.and_then(|s| s.url.as_deref()));
        let model = invocation
            .model
            .as_deref()
            .or_else(|| settings.and_then(|s| s.model.as_deref()));

        let Resolution {
            endpoint,
            profile,
            model,
        } = EndpointResolver::new(&self.registry).resolve(raw_endpoint, declared, selected, model)?;

        tracing::info!(
            provider = %profile.name,
            protocol = %profile.family,
            %endpoint,
            %model,
            "resolved endpoint"
        );

        let request = CanonicalRequest {
            model,
            system_text: self.prompt.system.clone(),
            user_text: self.prompt.render(&invocation.files, &invocation.prompt_text),
            sampling: invocation.sampling.unwrap_or(self.sampling),
            streaming: profile.family.is_chunked(),
        };

        let credential = invocation
            .credential
            .as_ref()
            .or_else(|| settings.and_then(|s| s.api_key.as_ref()));
        let prepared = build_request(&request, profile, credential)?;

        tracing::debug!(
            model = %request.model,
            temperature = request.sampling.temperature,
            top_p = request.sampling.top_p,
            max_tokens = request.sampling.max_tokens,
            streaming = request.streaming,
            prompt_len = request.user_text.len(),
            "sending completion request"
        );

        let stream = self
            .transport
            .open(TransportRequest {
                endpoint,
                headers: prepared.headers,
                body: prepared.body.to_bytes()?,
            })
            .await?;

        live.reset();
        consume(stream, profile.family, live).await
    }
}

/// Drive `stream` to completion for `family`
///
/// # Errors
///
/// Returns `LlmError::Transport` on a mid-stream failure, otherwise whatever
/// the completion resolver decides at end of stream
pub async fn consume(mut stream: ChunkStream, family: ProtocolFamily, live: &LiveOutput) -> Result<String, LlmError> {
    let mut demux = Demultiplexer::new(family);
    let mut state = StreamState::new();

    while let Some(chunk) = stream.next().await {
        for record in demux.push(&chunk?) {
            for update in state.apply(record) {
                live.publish(update);
            }
        }
    }

    match demux.finish() {
        Flush::Records(records) => {
            for update in records.into_iter().flat_map(|record| state.apply(record)) {
                live.publish(update);
            }
            resolve_stream(state)
        }
        Flush::Document(body) => resolve_document(&body),
    }
}
