//! Mock vendor server for integration tests
//!
//! Accepts any POST, records it, and replies with a scripted sequence of body
//! chunks, each flushed separately so the client sees real fragmentation.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;

/// Request as received by the mock
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

/// Vendor endpoint replaying canned chunks
pub struct MockVendor {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockVendorState>,
}

struct MockVendorState {
    status: StatusCode,
    chunks: Vec<Bytes>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockVendor {
    /// Start a mock answering 200 with `chunks`
    pub async fn start<C: Into<Bytes>>(chunks: Vec<C>) -> anyhow::Result<Self> {
        Self::start_with_status(StatusCode::OK, chunks).await
    }

    /// Start a mock answering `status` with `chunks`
    pub async fn start_with_status<C: Into<Bytes>>(status: StatusCode, chunks: Vec<C>) -> anyhow::Result<Self> {
        let state = Arc::new(MockVendorState {
            status,
            chunks: chunks.into_iter().map(Into::into).collect(),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new().fallback(handle).with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL without a path
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

impl Drop for MockVendor {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle(State(state): State<Arc<MockVendorState>>, uri: Uri, headers: HeaderMap, body: Bytes) -> Response {
    let body = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    state.requests.lock().unwrap().push(RecordedRequest {
        path: uri.path().to_owned(),
        headers,
        body,
    });

    let chunks = futures_util::stream::iter(state.chunks.clone()).then(|chunk| async move {
        tokio::time::sleep(Duration::from_millis(5)).await;
        Ok::<_, Infallible>(chunk)
    });

    (state.status, Body::from_stream(chunks)).into_response()
}

/// Address nothing listens on
pub async fn closed_port() -> anyhow::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(addr)
}
