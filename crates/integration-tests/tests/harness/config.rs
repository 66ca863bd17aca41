//! Programmatic configuration builder for integration tests

use std::{net::SocketAddr, time::Duration};

use picto_config::{
    BgRemoveProviderConfig, BgRemoveProviderType, Config, CorsConfig, ImageGenProviderConfig, ImageGenProviderType,
    ServerConfig, StorageConfig,
};
use secrecy::SecretString;

pub const TEST_API_KEY: &str = "test-key";

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with no providers and an in-memory store
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    ..ServerConfig::default()
                },
                storage: StorageConfig {
                    database_url: "sqlite::memory:".to_owned(),
                    ..StorageConfig::default()
                },
                ..Config::default()
            },
        }
    }

    /// Bind text-to-image to a mock `ModelsLab` backend
    pub fn with_modelslab(mut self, base_url: &str) -> Self {
        self.config.imagegen.provider = Some(imagegen_provider(ImageGenProviderType::Modelslab, base_url));
        self
    }

    /// Bind text-to-image to a mock `OpenAI` backend
    pub fn with_openai(mut self, base_url: &str) -> Self {
        self.config.imagegen.provider = Some(imagegen_provider(ImageGenProviderType::Openai, base_url));
        self
    }

    /// Bind background removal to a mock remove.bg backend
    pub fn with_remove_bg(mut self, base_url: &str) -> Self {
        self.config.bgremove.provider = Some(BgRemoveProviderConfig {
            provider_type: BgRemoveProviderType::RemoveBg,
            api_key: Some(SecretString::from(TEST_API_KEY)),
            base_url: Some(base_url.to_owned()),
            size: None,
        });
        self
    }

    /// Bound every provider call to `timeout`
    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.config.imagegen.timeout = timeout;
        self.config.bgremove.timeout = timeout;
        self
    }

    /// Store records in the given database instead of memory
    pub fn with_database_url(mut self, database_url: String) -> Self {
        self.config.storage.database_url = database_url;
        self
    }

    /// URL recorded for uploads
    pub fn with_placeholder_url(mut self, url: &str) -> Self {
        self.config.storage.placeholder_url = url.to_owned();
        self
    }

    /// Set CORS configuration
    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = Some(config);
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}

fn imagegen_provider(provider_type: ImageGenProviderType, base_url: &str) -> ImageGenProviderConfig {
    ImageGenProviderConfig {
        provider_type,
        api_key: Some(SecretString::from(TEST_API_KEY)),
        base_url: Some(base_url.to_owned()),
        model: None,
        size: None,
        steps: None,
        guidance_scale: None,
        aspect_ratio: None,
    }
}
