#![allow(clippy::must_use_candidate)]

pub mod bgremove;
pub mod cors;
mod duration;
mod env;
pub mod health;
pub mod imagegen;
mod loader;
pub mod server;
pub mod storage;
pub mod telemetry;

use serde::Deserialize;

pub use bgremove::*;
pub use cors::*;
pub use health::*;
pub use imagegen::*;
pub use server::*;
pub use storage::*;
pub use telemetry::*;

/// Default timeout applied to every outbound provider call
pub const DEFAULT_PROVIDER_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Top-level Picto configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Text-to-image provider binding
    #[serde(default)]
    pub imagegen: ImageGenConfig,
    /// Background-removal provider binding
    #[serde(default)]
    pub bgremove: BgRemoveConfig,
    /// Image record storage
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
