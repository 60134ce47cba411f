//! Error types shared by the composer, the image fetcher and the providers

use serde::Serialize;
use thiserror::Error;

/// Errors raised by a text or image provider backend
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network failure, timeout, or the request could not be sent
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// Provider answered with a non-success status
    #[error("API returned error: {status} - {body}")]
    Api { status: u16, body: String },

    /// Provider answered 2xx but the body was not what we expected
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Provider selected but credentials/settings are missing
    #[error("provider not configured: {0}")]
    NotConfigured(String),
}

impl ProviderError {
    /// HTTP status reported by the provider, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        ProviderError::RequestFailed(e.to_string())
    }
}

/// Failure kind surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    ProviderError,
    FormatError,
    DecodeError,
}

/// Failure of a single composer or fetcher operation
#[derive(Debug, Error)]
pub enum PostError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The raw reply is kept so callers can diagnose template drift
    #[error("reply did not split into COPY/HASHTAGS/IMAGEN_PROMPT segments")]
    Format { raw: String },

    #[error("image payload could not be decoded: {0}")]
    Decode(String),
}

impl PostError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PostError::InvalidInput(_) => ErrorKind::InvalidInput,
            PostError::Provider(_) => ErrorKind::ProviderError,
            PostError::Format { .. } => ErrorKind::FormatError,
            PostError::Decode(_) => ErrorKind::DecodeError,
        }
    }

    /// Diagnostic detail for display (raw reply for format errors)
    pub fn detail(&self) -> Option<String> {
        match self {
            PostError::Format { raw } => Some(raw.clone()),
            PostError::Provider(e) => Some(e.to_string()),
            _ => None,
        }
    }
}
