//! Post generation pipeline
//!
//! Two-step process, strictly sequential:
//! 1. The text provider writes the copy, the hashtags and an image prompt
//! 2. The image provider renders that prompt
//!
//! Each run is independent: the pipeline holds only the two provider handles.

use serde::Serialize;
use thiserror::Error;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::composer::PostComposer;
use crate::config::Settings;
use crate::error::{PostError, ProviderError};
use crate::images::{self, ImageFetcher};
use crate::post::{FinishedPost, GeneratedPost, PostRequest};
use crate::text;

/// Pipeline stage that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Compose,
    Image,
}

/// Failure of a pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to compose post: {0}")]
    Compose(#[source] PostError),

    /// The text is still usable, only the image is missing
    #[error("failed to generate image: {error}")]
    Image {
        post: GeneratedPost,
        #[source]
        error: PostError,
    },
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Compose(_) => Stage::Compose,
            PipelineError::Image { .. } => Stage::Image,
        }
    }

    /// The underlying operation error
    pub fn error(&self) -> &PostError {
        match self {
            PipelineError::Compose(e) => e,
            PipelineError::Image { error, .. } => error,
        }
    }

    /// Text composed before the image stage failed
    pub fn post(&self) -> Option<&GeneratedPost> {
        match self {
            PipelineError::Compose(_) => None,
            PipelineError::Image { post, .. } => Some(post),
        }
    }
}

/// Composer followed by image fetcher
#[derive(Debug, Clone)]
pub struct Pipeline {
    composer: PostComposer,
    fetcher: ImageFetcher,
}

impl Pipeline {
    /// Create a pipeline from its two stages
    pub fn new(composer: PostComposer, fetcher: ImageFetcher) -> Self {
        Self { composer, fetcher }
    }

    /// Build both providers from settings
    pub fn from_settings(settings: &Settings) -> Result<Self, ProviderError> {
        let text = text::from_settings(settings)?;
        let images = images::from_settings(settings)?;
        Ok(Self::new(PostComposer::new(text), ImageFetcher::new(images)))
    }

    pub fn composer(&self) -> &PostComposer {
        &self.composer
    }

    pub fn fetcher(&self) -> &ImageFetcher {
        &self.fetcher
    }

    /// Text stage only
    pub async fn compose(&self, request: &PostRequest) -> Result<GeneratedPost, PostError> {
        self.composer
            .compose(&request.profile, &request.topic_idea)
            .await
    }

    /// Run both stages. The image provider is only called after a usable post
    /// has been composed.
    pub async fn run(&self, request: PostRequest) -> Result<FinishedPost, PipelineError> {
        let run_id = Uuid::new_v4();

        async move {
            let (post, raw) = self
                .composer
                .compose_reply(&request.profile, &request.topic_idea)
                .await
                .map_err(|e| {
                    warn!("Compose stage failed: {}", e);
                    PipelineError::Compose(e)
                })?;

            // Three segments but nothing to show or render
            if post.copy.is_empty() || post.image_prompt.is_empty() {
                warn!("Composed post is missing copy or image prompt");
                return Err(PipelineError::Compose(PostError::Format { raw }));
            }

            let image = match self.fetcher.fetch(&post.image_prompt).await {
                Ok(image) => image,
                Err(error) => {
                    warn!("Image stage failed: {}", error);
                    return Err(PipelineError::Image { post, error });
                }
            };

            info!(
                "Post for '{}' ready: {} bytes of {}",
                request.profile.name,
                image.data.len(),
                image.mime_type()
            );

            Ok(FinishedPost {
                post,
                image,
                generated_at: chrono::Utc::now(),
            })
        }
        .instrument(info_span!("pipeline", %run_id))
        .await
    }
}
