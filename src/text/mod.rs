//! Text-generation providers
//!
//! Provides:
//! - `TextGenerator` trait used by the composer
//! - Gemini (Google Generative Language API)
//! - Venice (OpenAI-compatible chat completions)
//! - Fake provider for offline runs and tests

mod fake;
mod gemini;
mod venice;

pub use fake::{FakeTextGenerator, SAMPLE_REPLY};
pub use gemini::GeminiClient;
pub use venice::{ChatMessage, VeniceClient};

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{Settings, TextProviderKind};
use crate::error::ProviderError;

/// A model that turns one prompt into one text reply.
///
/// Implementations hold only immutable configuration so a single instance can
/// serve concurrent pipeline runs.
#[async_trait]
pub trait TextGenerator: Send + Sync + fmt::Debug {
    /// Send the prompt and return the model's raw reply
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Provider name (e.g. "gemini", "venice", "fake")
    fn provider_name(&self) -> &'static str;

    /// Model identifier
    fn model_name(&self) -> &str;
}

/// Build the text provider selected in `settings`
pub fn from_settings(settings: &Settings) -> Result<Arc<dyn TextGenerator>, ProviderError> {
    let text = &settings.text;
    let api_key = settings.text_api_key().unwrap_or_default();

    let provider: Arc<dyn TextGenerator> = match text.provider {
        TextProviderKind::Gemini => Arc::new(GeminiClient::new(
            api_key,
            text.model.as_deref().unwrap_or(gemini::DEFAULT_MODEL),
            text.base_url.as_deref().unwrap_or(gemini::DEFAULT_BASE_URL),
            settings.timeout(),
        )?),
        TextProviderKind::Venice => Arc::new(VeniceClient::new(
            api_key,
            text.model.as_deref().unwrap_or(venice::DEFAULT_MODEL),
            text.base_url.as_deref().unwrap_or(venice::DEFAULT_BASE_URL),
            settings.timeout(),
        )?),
        TextProviderKind::Fake => Arc::new(FakeTextGenerator::default()),
    };

    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_settings_selects_provider() {
        let mut settings = Settings::default();
        settings.text.provider = TextProviderKind::Fake;
        assert_eq!(from_settings(&settings).unwrap().provider_name(), "fake");

        settings.text.provider = TextProviderKind::Venice;
        settings.text.api_key = Some("key".to_string());
        let venice = from_settings(&settings).unwrap();
        assert_eq!(venice.provider_name(), "venice");
        assert_eq!(venice.model_name(), venice::DEFAULT_MODEL);

        settings.text.provider = TextProviderKind::Gemini;
        settings.text.model = Some("models/gemini-2.5-pro".to_string());
        let gemini = from_settings(&settings).unwrap();
        assert_eq!(gemini.provider_name(), "gemini");
        assert_eq!(gemini.model_name(), "gemini-2.5-pro");
    }

    #[test]
    fn test_from_settings_requires_key() {
        let mut settings = Settings::default();
        settings.text.api_key = None;
        settings.secrets.google_api_key = None;
        let err = from_settings(&settings).unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }
}
