use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;

/// Text-to-image gateway configuration
///
/// Exactly one provider can be bound at a time. Leaving `provider` unset
/// disables the generate endpoint.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageGenConfig {
    /// Provider binding
    #[serde(default)]
    pub provider: Option<ImageGenProviderConfig>,
    /// Upper bound on a single provider call
    #[serde(
        default = "crate::duration::default_timeout",
        deserialize_with = "crate::duration::deserialize"
    )]
    pub timeout: Duration,
}

impl Default for ImageGenConfig {
    fn default() -> Self {
        Self {
            provider: None,
            timeout: crate::DEFAULT_PROVIDER_TIMEOUT,
        }
    }
}

/// Configuration for the bound text-to-image provider
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageGenProviderConfig {
    /// Provider type
    #[serde(rename = "type")]
    pub provider_type: ImageGenProviderType,
    /// API key
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<String>,
    /// Model identifier sent upstream (provider default when unset)
    #[serde(default)]
    pub model: Option<String>,
    /// Output size, e.g. `1024x1024` (`OpenAI` only)
    #[serde(default)]
    pub size: Option<String>,
    /// Sampling steps (`ModelsLab` only)
    #[serde(default)]
    pub steps: Option<u32>,
    /// Classifier-free guidance scale (`ModelsLab` only)
    #[serde(default)]
    pub guidance_scale: Option<f32>,
    /// Aspect ratio, e.g. `1:1` (`ModelsLab` only)
    #[serde(default)]
    pub aspect_ratio: Option<String>,
}

/// Supported text-to-image providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageGenProviderType {
    /// `ModelsLab` realtime text2img
    Modelslab,
    /// `OpenAI` image generation
    Openai,
}
