//! Venice AI provider (OpenAI-compatible chat completions)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::TextGenerator;
use crate::error::ProviderError;

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.venice.ai/api/v1";

/// Default model
pub const DEFAULT_MODEL: &str = "llama-3.3-70b";

/// Chat message for LLM
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

/// Chat completion request
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Venice AI client
#[derive(Debug)]
pub struct VeniceClient {
    /// HTTP client
    client: Client,
    /// API key
    api_key: String,
    /// API base URL
    base_url: String,
    /// Chat model
    model: String,
}

impl VeniceClient {
    /// Create a new Venice client
    pub fn new(
        api_key: &str,
        model: &str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        if api_key.trim().is_empty() {
            return Err(ProviderError::NotConfigured(
                "Venice API key (VENICE_API_KEY) not set".to_string(),
            ));
        }

        Ok(Self {
            client: crate::http::client(timeout)?,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    fn request_body(&self, prompt: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user(prompt)],
            max_tokens: 2048,
            temperature: 0.7,
        }
    }
}

#[async_trait]
impl TextGenerator for VeniceClient {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = self.request_body(prompt);

        debug!("Sending chat request to Venice API: {:?}", request.model);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let response = crate::http::check_status("Venice", response).await?;

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ProviderError::Parse("No response from API".to_string()))
    }

    fn provider_name(&self) -> &'static str {
        "venice"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
