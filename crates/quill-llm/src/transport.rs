//! Transport seam between the adapter and the network

use std::pin::Pin;
#[cfg(test)]
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use http::HeaderMap;

use crate::endpoint::ResolvedEndpoint;
use crate::error::LlmError;

/// Raw response body chunks in arrival order
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<Bytes, LlmError>> + Send>>;

/// One POST to a vendor endpoint
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// Request target
    pub endpoint: ResolvedEndpoint,
    /// Request headers
    pub headers: HeaderMap,
    /// Serialized body, written once
    pub body: Bytes,
}

/// Sends a request and yields the response body as it arrives
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open the request
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Transport` if the connection fails
    async fn open(&self, request: TransportRequest) -> Result<ChunkStream, LlmError>;
}

/// HTTP transport backed by `reqwest`
///
/// Non-success statuses are not errors here: vendors describe failures in
/// the body, which the demultiplexer knows how to read.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Transport with a default client
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Transport` if the TLS backend cannot be initialised
    pub fn new() -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .read_timeout(Duration::from_secs(120))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| LlmError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn open(&self, request: TransportRequest) -> Result<ChunkStream, LlmError> {
        let url = request.endpoint.url()?;

        let response = self
            .client
            .post(url)
            .headers(request.headers)
            .body(request.body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(endpoint = %request.endpoint, error = %e, "vendor request failed");
                LlmError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(endpoint = %request.endpoint, %status, "vendor returned non-success status");
        }

        let stream = response.bytes_stream().map(|chunk| {
            chunk.map_err(|e| {
                tracing::error!(error = %e, "response stream interrupted");
                LlmError::Transport(e.to_string())
            })
        });

        Ok(Box::pin(stream))
    }
}

/// In-memory transport replaying fixed chunks
///
/// Every request passed to [`Transport::open`] is recorded for inspection.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    chunks: Vec<Bytes>,
    failure: Option<String>,
    requests: Mutex<Vec<TransportRequest>>,
}

#[cfg(test)]
impl ScriptedTransport {
    /// Transport that answers every request with `chunks`
    pub fn new<I, C>(chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Bytes>,
    {
        Self {
            chunks: chunks.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Transport whose connection always fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Requests opened so far
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[cfg(test)]
#[async_trait]
impl Transport for ScriptedTransport {
    async fn open(&self, request: TransportRequest) -> Result<ChunkStream, LlmError> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).push(request);

        if let Some(message) = &self.failure {
            return Err(LlmError::Transport(message.clone()));
        }

        let chunks: Vec<Result<Bytes, LlmError>> = self.chunks.iter().cloned().map(Ok).collect();
        Ok(Box::pin(futures_util::stream::iter(chunks)))
    }
}
