//! Shared reqwest plumbing for provider backends

use std::time::Duration;

use reqwest::{Client, Response};
use tracing::warn;

use crate::error::ProviderError;

/// Build an HTTP client with a bounded per-request timeout
pub fn client(timeout: Duration) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::NotConfigured(format!("failed to build HTTP client: {}", e)))
}

/// Turn a non-success response into `ProviderError::Api` carrying status and body
pub async fn check_status(provider: &str, response: Response) -> Result<Response, ProviderError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    warn!("{} API error: {} - {}", provider, status, body);
    Err(ProviderError::Api {
        status: status.as_u16(),
        body,
    })
}
