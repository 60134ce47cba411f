//! Image generation module
//!
//! Provides:
//! - `ImageGenerator` trait for image providers
//! - Stability AI text-to-image client
//! - `ImageFetcher`, which decodes the provider's base64 payload

mod fake;
mod fetch;
mod stability;

pub use fake::{FakeImageGenerator, SAMPLE_PNG_BASE64};
pub use fetch::ImageFetcher;
pub use stability::{
    GenerationParams, GenerationRequest, StabilityClient, TextPrompt, DEFAULT_API_HOST,
    DEFAULT_ENGINE_ID, DEFAULT_NEGATIVE_PROMPT,
};

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{ImageProviderKind, Settings};
use crate::error::ProviderError;

/// A provider that renders one prompt into one image.
#[async_trait]
pub trait ImageGenerator: Send + Sync + fmt::Debug {
    /// Generate one image and return its base64 payload as sent by the provider
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Provider name (e.g. "stability", "fake")
    fn provider_name(&self) -> &'static str;

    /// Engine/model identifier
    fn engine_name(&self) -> &str;
}

/// Build the image provider selected in `settings`
pub fn from_settings(settings: &Settings) -> Result<Arc<dyn ImageGenerator>, ProviderError> {
    let image = &settings.image;

    let provider: Arc<dyn ImageGenerator> = match image.provider {
        ImageProviderKind::Stability => Arc::new(StabilityClient::new(
            settings.image_api_key().unwrap_or_default(),
            &image.api_host,
            &image.engine_id,
            image.params(),
            settings.timeout(),
        )?),
        ImageProviderKind::Fake => Arc::new(FakeImageGenerator::default()),
    };

    Ok(provider)
}
