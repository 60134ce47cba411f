//! Image fetcher: prompt in, decoded image bytes out

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use tracing::{debug, info, warn};

use super::ImageGenerator;
use crate::error::{PostError, ProviderError};
use crate::post::{require_non_empty, GeneratedImage};

const DECODE_FAILED: &str = "image payload missing or not valid base64";

/// Fetches one image per prompt from an image provider
#[derive(Debug, Clone)]
pub struct ImageFetcher {
    images: Arc<dyn ImageGenerator>,
}

impl ImageFetcher {
    /// Create a fetcher over an image provider
    pub fn new(images: Arc<dyn ImageGenerator>) -> Self {
        Self { images }
    }

    /// The underlying image provider
    pub fn provider(&self) -> &dyn ImageGenerator {
        self.images.as_ref()
    }

    /// Generate and decode one image. No retries, no caching.
    pub async fn fetch(&self, image_prompt: &str) -> Result<GeneratedImage, PostError> {
        require_non_empty("image_prompt", image_prompt)?;

        info!(
            "Requesting image from {} ({})",
            self.images.provider_name(),
            self.images.engine_name()
        );

        let payload = self
            .images
            .generate(image_prompt)
            .await
            .map_err(|e| match e {
                // Body arrived but was unusable: report as decode failure
                ProviderError::Parse(detail) => {
                    warn!("Unusable image response: {}", detail);
                    PostError::Decode(DECODE_FAILED.to_string())
                }
                other => PostError::Provider(other),
            })?;

        let data = decode_payload(&payload)?;
        debug!("Decoded image: {} bytes", data.len());

        Ok(GeneratedImage::new(data, image_prompt))
    }
}

/// Decode a base64 payload, rejecting empty results
fn decode_payload(payload: &str) -> Result<Vec<u8>, PostError> {
    let data = BASE64.decode(payload.trim()).map_err(|e| {
        warn!("Invalid base64 image payload: {}", e);
        PostError::Decode(DECODE_FAILED.to_string())
    })?;

    if data.is_empty() {
        return Err(PostError::Decode(DECODE_FAILED.to_string()));
    }

    Ok(data)
}
