use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;

/// Background-removal gateway configuration
///
/// Leaving `provider` unset disables the remove-background endpoint.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BgRemoveConfig {
    /// Provider binding
    #[serde(default)]
    pub provider: Option<BgRemoveProviderConfig>,
    /// Upper bound on a single provider call
    #[serde(
        default = "crate::duration::default_timeout",
        deserialize_with = "crate::duration::deserialize"
    )]
    pub timeout: Duration,
}

impl Default for BgRemoveConfig {
    fn default() -> Self {
        Self {
            provider: None,
            timeout: crate::DEFAULT_PROVIDER_TIMEOUT,
        }
    }
}

/// Configuration for the bound background-removal provider
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BgRemoveProviderConfig {
    /// Provider type
    #[serde(rename = "type")]
    pub provider_type: BgRemoveProviderType,
    /// API key
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<String>,
    /// Output size requested from the provider (`auto` when unset)
    #[serde(default)]
    pub size: Option<String>,
}

/// Supported background-removal providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BgRemoveProviderType {
    /// remove.bg
    RemoveBg,
}
