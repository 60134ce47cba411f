//! Stability AI text-to-image client (v1 generation API)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::ImageGenerator;
use crate::error::ProviderError;

/// Default API host
pub const DEFAULT_API_HOST: &str = "https://api.stability.ai";

/// Default engine
pub const DEFAULT_ENGINE_ID: &str = "stable-diffusion-xl-1024-v1-0";

/// Negative prompt steering away from common artifacts
pub const DEFAULT_NEGATIVE_PROMPT: &str = "blurry, bad, ugly, low quality, watermark, text";

/// Tunable generation parameters
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub cfg_scale: f32,
    pub width: u32,
    pub height: u32,
    pub steps: u32,
    pub negative_prompt: String,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            cfg_scale: 7.0,
            width: 1024,
            height: 1024,
            steps: 30,
            negative_prompt: DEFAULT_NEGATIVE_PROMPT.to_string(),
        }
    }
}

/// Weighted prompt entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextPrompt {
    pub text: String,
    /// Positive steers towards, negative away from
    pub weight: f32,
}

/// text-to-image request body
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    pub text_prompts: Vec<TextPrompt>,
    pub cfg_scale: f32,
    pub height: u32,
    pub width: u32,
    pub samples: u32,
    pub steps: u32,
}

/// text-to-image response body
#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    artifacts: Vec<Artifact>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Artifact {
    base64: Option<String>,
    finish_reason: Option<String>,
}

/// Stability AI client
#[derive(Debug)]
pub struct StabilityClient {
    client: Client,
    api_key: String,
    api_host: String,
    engine_id: String,
    params: GenerationParams,
}

impl StabilityClient {
    /// Create a new Stability client
    pub fn new(
        api_key: &str,
        api_host: &str,
        engine_id: &str,
        params: GenerationParams,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        if api_key.trim().is_empty() {
            return Err(ProviderError::NotConfigured(
                "Stability API key (STABILITY_API_KEY) not set".to_string(),
            ));
        }

        Ok(Self {
            client: crate::http::client(timeout)?,
            api_key: api_key.to_string(),
            api_host: api_host.trim_end_matches('/').to_string(),
            engine_id: engine_id.to_string(),
            params,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/generation/{}/text-to-image",
            self.api_host, self.engine_id
        )
    }

    /// Build the request body: the prompt at weight 1.0, the fixed negative
    /// prompt at weight -1.0, one sample.
    pub fn build_request(&self, prompt: &str) -> GenerationRequest {
        GenerationRequest {
            text_prompts: vec![
                TextPrompt {
                    text: prompt.to_string(),
                    weight: 1.0,
                },
                TextPrompt {
                    text: self.params.negative_prompt.clone(),
                    weight: -1.0,
                },
            ],
            cfg_scale: self.params.cfg_scale,
            height: self.params.height,
            width: self.params.width,
            samples: 1,
            steps: self.params.steps,
        }
    }
}

/// Base64 payload of the first artifact
fn first_payload(response: GenerationResponse) -> Result<String, ProviderError> {
    let artifact = response
        .artifacts
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Parse("response has no artifacts".to_string()))?;

    if artifact.finish_reason.as_deref() == Some("CONTENT_FILTERED") {
        warn!("Stability flagged the generated image as filtered");
    }

    artifact
        .base64
        .ok_or_else(|| ProviderError::Parse("artifact has no base64 payload".to_string()))
}

#[async_trait]
impl ImageGenerator for StabilityClient {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = self.build_request(prompt);

        debug!(
            "Sending text-to-image request to Stability: {} ({}x{}, {} steps)",
            self.engine_id, request.width, request.height, request.steps
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
            .json(&request)
            .send()
            .await?;

        let response = crate::http::check_status("Stability", response).await?;

        let body: GenerationResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        first_payload(body)
    }

    fn provider_name(&self) -> &'static str {
        "stability"
    }

    fn engine_name(&self) -> &str {
        &self.engine_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stability() -> StabilityClient {
        StabilityClient::new(
            "key",
            "https://api.stability.ai/",
            DEFAULT_ENGINE_ID,
            GenerationParams::default(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            stability().endpoint(),
            "https://api.stability.ai/v1/generation/stable-diffusion-xl-1024-v1-0/text-to-image"
        );
    }

    #[test]
    fn test_request_shape() {
        for prompt in ["cozy cafe", "x", "a very long prompt about croissants and rain"] {
            let request = stability().build_request(prompt);

            let positive: Vec<_> = request.text_prompts.iter().filter(|p| p.weight > 0.0).collect();
            let negative: Vec<_> = request.text_prompts.iter().filter(|p| p.weight < 0.0).collect();
            assert_eq!(positive.len(), 1);
            assert_eq!(negative.len(), 1);
            assert_eq!(positive[0].text, prompt);
            assert_eq!(positive[0].weight, 1.0);
            assert_eq!(negative[0].text, DEFAULT_NEGATIVE_PROMPT);
            assert_eq!(negative[0].weight, -1.0);
            assert_eq!(request.samples, 1);
        }
    }

    #[test]
    fn test_request_json_defaults() {
        let body = serde_json::to_value(stability().build_request("cozy cafe")).unwrap();
        assert_eq!(body["cfg_scale"], 7.0);
        assert_eq!(body["height"], 1024);
        assert_eq!(body["width"], 1024);
        assert_eq!(body["samples"], 1);
        assert_eq!(body["steps"], 30);
        assert_eq!(body["text_prompts"][1]["weight"], -1.0);
    }

    #[test]
    fn test_custom_params_keep_single_sample() {
        let params = GenerationParams {
            steps: 50,
            width: 768,
            ..GenerationParams::default()
        };
        let client = StabilityClient::new(
            "key",
            DEFAULT_API_HOST,
            DEFAULT_ENGINE_ID,
            params,
            Duration::from_secs(5),
        )
        .unwrap();
        let request = client.build_request("p");
        assert_eq!(request.steps, 50);
        assert_eq!(request.width, 768);
        assert_eq!(request.samples, 1);
    }

    #[test]
    fn test_first_payload() {
        let response: GenerationResponse = serde_json::from_value(serde_json::json!({
            "artifacts": [
                {"base64": "AAAA", "seed": 1, "finishReason": "SUCCESS"},
                {"base64": "BBBB", "seed": 2, "finishReason": "SUCCESS"}
            ]
        }))
        .unwrap();
        assert_eq!(first_payload(response).unwrap(), "AAAA");
    }

    #[test]
    fn test_first_payload_missing() {
        let empty: GenerationResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(matches!(first_payload(empty), Err(ProviderError::Parse(_))));

        let no_b64: GenerationResponse =
            serde_json::from_value(serde_json::json!({"artifacts": [{"seed": 1}]})).unwrap();
        assert!(matches!(first_payload(no_b64), Err(ProviderError::Parse(_))));
    }

    #[test]
    fn test_missing_key() {
        let err = StabilityClient::new(
            "",
            DEFAULT_API_HOST,
            DEFAULT_ENGINE_ID,
            GenerationParams::default(),
            Duration::from_secs(5),
        )
        .unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }
}
