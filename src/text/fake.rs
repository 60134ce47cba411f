//! Fake text provider for offline runs and tests.
//!
//! Returns a fixed reply (or a fixed error) and counts how often it was called.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::TextGenerator;
use crate::error::ProviderError;

/// Canned reply in the expected three-segment format
pub const SAMPLE_REPLY: &str = "COPY:
¿Llueve afuera? Acá adentro hay café calentito y medialunas recién horneadas ☕🥐
Vení a refugiarte con nosotros, ¡te esperamos!
---
HASHTAGS:
#VillaCrespo #CafeDeEspecialidad #Cafeteria #DiaDeLluvia #Medialunas #BrunchBA #CABA
---
IMAGEN_PROMPT:
Cozy rustic specialty coffee shop on a rainy day, steaming latte and croissants on a wooden table, rain on the window, warm lighting, photorealistic";

/// A fake text provider
#[derive(Debug)]
pub struct FakeTextGenerator {
    /// Ok(reply) or Err(message)
    reply: Result<String, String>,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl Default for FakeTextGenerator {
    fn default() -> Self {
        Self::with_reply(SAMPLE_REPLY)
    }
}

impl FakeTextGenerator {
    /// Always answer with `reply`
    pub fn with_reply(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// Always fail with `ProviderError::RequestFailed(message)`
    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// Number of `generate` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent prompt received
    pub async fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().await.clone()
    }
}

#[async_trait]
impl TextGenerator for FakeTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().await = Some(prompt.to_string());

        self.reply
            .clone()
            .map_err(ProviderError::RequestFailed)
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}
