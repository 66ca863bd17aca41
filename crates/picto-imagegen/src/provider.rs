pub(crate) mod modelslab;
pub(crate) mod openai;

use async_trait::async_trait;
use picto_core::ImageRef;

use crate::error::Result;

/// A text-to-image backend
///
/// Each call performs exactly one outbound request. Implementations never
/// retry; the HTTP client they are built with carries the call timeout.
#[async_trait]
pub trait ImageGenProvider: Send + Sync {
    /// Generate one image for `prompt`
    async fn generate(&self, prompt: &str) -> Result<ImageRef>;

    /// Get the provider name
    fn name(&self) -> &str;
}
