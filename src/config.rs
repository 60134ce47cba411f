//! Layered configuration
//!
//! Sources, later ones win:
//! 1. built-in defaults
//! 2. TOML file (`mycm.toml` in the working directory, or an explicit path)
//! 3. well-known secrets: `GOOGLE_API_KEY`, `VENICE_API_KEY`, `STABILITY_API_KEY`
//! 4. `MYCM_`-prefixed environment, `__` nests (`MYCM_IMAGE__STEPS=40`)

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::images::{
    GenerationParams, DEFAULT_API_HOST, DEFAULT_ENGINE_ID, DEFAULT_NEGATIVE_PROMPT,
};

/// Config file looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "mycm.toml";

const SECRET_VARS: [&str; 3] = ["GOOGLE_API_KEY", "VENICE_API_KEY", "STABILITY_API_KEY"];

/// Text provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextProviderKind {
    #[default]
    Gemini,
    Venice,
    Fake,
}

/// Image provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageProviderKind {
    #[default]
    Stability,
    Fake,
}

/// Text provider settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSettings {
    pub provider: TextProviderKind,
    /// Provider default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Provider default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Falls back to the provider's well-known variable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Image provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    pub provider: ImageProviderKind,
    pub engine_id: String,
    pub api_host: String,
    /// Falls back to `STABILITY_API_KEY`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub cfg_scale: f32,
    pub width: u32,
    pub height: u32,
    pub steps: u32,
    pub negative_prompt: String,
}

impl Default for ImageSettings {
    fn default() -> Self {
        let params = GenerationParams::default();
        Self {
            provider: ImageProviderKind::default(),
            engine_id: DEFAULT_ENGINE_ID.to_string(),
            api_host: DEFAULT_API_HOST.to_string(),
            api_key: None,
            cfg_scale: params.cfg_scale,
            width: params.width,
            height: params.height,
            steps: params.steps,
            negative_prompt: DEFAULT_NEGATIVE_PROMPT.to_string(),
        }
    }
}

impl ImageSettings {
    /// Generation parameters for the Stability client
    pub fn params(&self) -> GenerationParams {
        GenerationParams {
            cfg_scale: self.cfg_scale,
            width: self.width,
            height: self.height,
            steps: self.steps,
            negative_prompt: self.negative_prompt.clone(),
        }
    }
}

/// Secrets picked up from the provider's conventional variables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Secrets {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venice_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stability_api_key: Option<String>,
}

/// Top-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    /// Per provider call
    pub request_timeout_secs: u64,
    pub text: TextSettings,
    pub image: ImageSettings,
    pub secrets: Secrets,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            request_timeout_secs: 60,
            text: TextSettings::default(),
            image: ImageSettings::default(),
            secrets: Secrets::default(),
        }
    }
}

impl Settings {
    /// Load settings from all sources
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        let toml = match path {
            Some(p) if !p.exists() => {
                return Err(format!("config file not found: {}", p.display()).into());
            }
            Some(p) => Toml::file(p),
            None => Toml::file(DEFAULT_CONFIG_FILE),
        };

        Self::figment(toml).extract()
    }

    fn figment(toml: figment::providers::Data<Toml>) -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(toml)
            .merge(
                Env::raw()
                    .only(&SECRET_VARS)
                    .map(|key| format!("secrets.{}", key.as_str().to_lowercase()).into()),
            )
            .merge(Env::prefixed("MYCM_").split("__"))
    }

    /// Per-call timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// API key for the selected text provider
    pub fn text_api_key(&self) -> Option<&str> {
        self.text.api_key.as_deref().or(match self.text.provider {
            TextProviderKind::Gemini => self.secrets.google_api_key.as_deref(),
            TextProviderKind::Venice => self.secrets.venice_api_key.as_deref(),
            TextProviderKind::Fake => None,
        })
    }

    /// API key for the selected image provider
    pub fn image_api_key(&self) -> Option<&str> {
        self.image
            .api_key
            .as_deref()
            .or(self.secrets.stability_api_key.as_deref())
    }
}
