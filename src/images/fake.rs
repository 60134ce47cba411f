//! Fake image provider for offline runs and tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::ImageGenerator;
use crate::error::ProviderError;

/// 1x1 transparent PNG
pub const SAMPLE_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

/// A fake image provider returning a fixed payload
#[derive(Debug)]
pub struct FakeImageGenerator {
    /// Ok(base64 payload) or Err(message)
    payload: Result<String, String>,
    calls: AtomicUsize,
}

impl Default for FakeImageGenerator {
    fn default() -> Self {
        Self::with_payload(SAMPLE_PNG_BASE64)
    }
}

impl FakeImageGenerator {
    /// Always return `payload` (not validated, so tests can feed bad base64)
    pub fn with_payload(payload: &str) -> Self {
        Self {
            payload: Ok(payload.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always fail with `ProviderError::RequestFailed(message)`
    pub fn failing(message: &str) -> Self {
        Self {
            payload: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `generate` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageGenerator for FakeImageGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.payload.clone().map_err(ProviderError::RequestFailed)
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn engine_name(&self) -> &str {
        "fake-engine"
    }
}
