use std::time::Duration;

use picto_config::BgRemoveProviderType;
use picto_core::ImageRef;
use reqwest::Client;

use crate::{
    error::{BgRemoveError, Result},
    provider::{BackgroundRemover, remove_bg::RemoveBgProvider},
    types::RemovalRequest,
};

/// Background-removal gateway holding at most one bound provider
pub struct Server {
    provider: Option<Box<dyn BackgroundRemover>>,
}

impl Server {
    pub fn new(provider: Option<Box<dyn BackgroundRemover>>) -> Self {
        Self { provider }
    }

    /// Name of the bound provider, if any
    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_deref().map(|provider| provider.name())
    }

    /// Run one background removal through the bound provider
    pub async fn remove_background(&self, request: RemovalRequest) -> Result<ImageRef> {
        if request.image.is_empty() {
            return Err(BgRemoveError::Validation("No image file provided".to_string()));
        }

        let provider = self.provider.as_deref().ok_or(BgRemoveError::NotConfigured)?;

        provider.remove_background(request).await
    }
}

/// Builder for constructing the background-removal server from configuration
pub struct BgRemoveServerBuilder<'a> {
    config: &'a picto_config::Config,
}

impl<'a> BgRemoveServerBuilder<'a> {
    pub fn new(config: &'a picto_config::Config) -> Self {
        Self { config }
    }

    pub fn build(self) -> Result<Server> {
        let Some(provider_config) = &self.config.bgremove.provider else {
            tracing::debug!("No background removal provider configured");
            return Ok(Server::new(None));
        };

        let api_key = provider_config.api_key.clone().ok_or_else(|| {
            BgRemoveError::Config("API key required for the background removal provider".to_string())
        })?;
        let client = http_client(self.config.bgremove.timeout)?;

        let provider: Box<dyn BackgroundRemover> = match provider_config.provider_type {
            BgRemoveProviderType::RemoveBg => Box::new(RemoveBgProvider::new(client, api_key, provider_config)),
        };

        tracing::debug!(
            provider = %provider.name(),
            timeout = ?self.config.bgremove.timeout,
            "Background removal server initialized"
        );

        Ok(Server::new(Some(provider)))
    }
}

fn http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| BgRemoveError::Config(format!("failed to build HTTP client: {e}")))
}
