//! StubProvider - stand-in for the text and image provider APIs
//!
//! Answers every request with a fixed status and body and keeps a copy of
//! what was sent so tests can assert on paths, headers and payloads.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// A request captured by the stub
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

impl RecordedRequest {
    /// Header value as a string, if present
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    body: String,
    delay: Duration,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Canned HTTP provider on a random local port
pub struct StubProvider {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: JoinHandle<()>,
}

impl StubProvider {
    /// Answer with `status` and a JSON body
    pub async fn json(status: u16, body: serde_json::Value) -> Result<Self> {
        Self::start(status, body.to_string(), Duration::ZERO).await
    }

    /// Answer with `status` and a raw text body
    pub async fn text(status: u16, body: &str) -> Result<Self> {
        Self::start(status, body.to_string(), Duration::ZERO).await
    }

    /// Answer after sleeping for `delay`
    pub async fn slow(delay: Duration, body: serde_json::Value) -> Result<Self> {
        Self::start(200, body.to_string(), delay).await
    }

    async fn start(status: u16, body: String, delay: Duration) -> Result<Self> {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            status: StatusCode::from_u16(status)?,
            body,
            delay,
            requests: requests.clone(),
        };

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let router = Router::new().fallback(record).with_state(state);
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                eprintln!("Stub provider error: {}", e);
            }
        });

        Ok(Self {
            addr,
            requests,
            handle,
        })
    }

    /// Base URL for provider settings
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// All requests received so far
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }

    /// Number of requests received so far
    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

impl Drop for StubProvider {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn record(
    State(state): State<StubState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    state.requests.lock().await.push(RecordedRequest {
        path: uri.path().to_string(),
        headers,
        body,
    });

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body,
    )
        .into_response()
}

/// Gemini generateContent body wrapping `text`
pub fn gemini_reply(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP",
            "index": 0
        }]
    })
}

/// Stability text-to-image body with one artifact
pub fn stability_reply(base64: &str) -> serde_json::Value {
    serde_json::json!({
        "artifacts": [{
            "base64": base64,
            "seed": 1234,
            "finishReason": "SUCCESS"
        }]
    })
}
