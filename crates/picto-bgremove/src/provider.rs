pub(crate) mod remove_bg;

use async_trait::async_trait;
use picto_core::ImageRef;

use crate::{error::Result, types::RemovalRequest};

/// A background-removal backend
#[async_trait]
pub trait BackgroundRemover: Send + Sync {
    /// Remove the background of `request.image`, filling it with the requested colour
    async fn remove_background(&self, request: RemovalRequest) -> Result<ImageRef>;

    /// Get the provider name
    fn name(&self) -> &str;
}
