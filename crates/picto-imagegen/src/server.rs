use std::time::Duration;

use picto_config::{ImageGenProviderConfig, ImageGenProviderType};
use picto_core::ImageRef;
use reqwest::Client;
use secrecy::SecretString;

use crate::{
    error::{ImageGenError, Result},
    provider::{ImageGenProvider, modelslab::ModelsLabProvider, openai::OpenAiImageGenProvider},
};

/// Text-to-image gateway holding at most one bound provider
pub struct Server {
    provider: Option<Box<dyn ImageGenProvider>>,
}

impl Server {
    /// Create a server around an already constructed provider
    pub fn new(provider: Option<Box<dyn ImageGenProvider>>) -> Self {
        Self { provider }
    }

    /// Name of the bound provider, if any
    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_deref().map(|provider| provider.name())
    }

    /// Generate one image for `prompt`
    ///
    /// Blank prompts are rejected before any provider is consulted.
    pub async fn generate(&self, prompt: &str) -> Result<ImageRef> {
        if prompt.trim().is_empty() {
            return Err(ImageGenError::Validation("Prompt is required".to_string()));
        }

        let provider = self.provider.as_deref().ok_or(ImageGenError::NotConfigured)?;

        provider.generate(prompt).await
    }
}

/// Builder for constructing the text-to-image server from configuration
pub struct ImageGenServerBuilder<'a> {
    config: &'a picto_config::Config,
}

impl<'a> ImageGenServerBuilder<'a> {
    pub fn new(config: &'a picto_config::Config) -> Self {
        Self { config }
    }

    pub fn build(self) -> Result<Server> {
        let Some(provider_config) = &self.config.imagegen.provider else {
            tracing::debug!("No image generation provider configured");
            return Ok(Server::new(None));
        };

        let api_key = resolve_api_key(provider_config)?;
        let client = http_client(self.config.imagegen.timeout)?;

        let provider: Box<dyn ImageGenProvider> = match provider_config.provider_type {
            ImageGenProviderType::Modelslab => Box::new(ModelsLabProvider::new(client, api_key, provider_config)),
            ImageGenProviderType::Openai => Box::new(OpenAiImageGenProvider::new(client, api_key, provider_config)),
        };

        tracing::debug!(
            provider = %provider.name(),
            timeout = ?self.config.imagegen.timeout,
            "Image generation server initialized"
        );

        Ok(Server::new(Some(provider)))
    }
}

/// One client per provider; the timeout bounds the whole call, body included
fn http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ImageGenError::Config(format!("failed to build HTTP client: {e}")))
}

fn resolve_api_key(config: &ImageGenProviderConfig) -> Result<SecretString> {
    config
        .api_key
        .clone()
        .ok_or_else(|| ImageGenError::Config("API key required for the image generation provider".to_string()))
}
