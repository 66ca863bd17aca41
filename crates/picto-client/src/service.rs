use std::sync::Arc;

use async_trait::async_trait;
use picto_core::ImageRef;

use crate::{
    client::PictoClient,
    error::Result,
    types::{FetchedImage, SelectedImage},
};

/// The remote operations a submission flow drives
///
/// [`PictoClient`] is the production implementation; anything else that can
/// produce an [`ImageRef`] (an in-process gateway, a test double) can stand
/// in for it.
#[async_trait]
pub trait ImageService: Send + Sync {
    /// Generate an image from a text prompt
    async fn generate(&self, prompt: &str) -> Result<ImageRef>;

    /// Remove the background of `image`
    async fn remove_background(&self, image: &SelectedImage, background_color: &str) -> Result<ImageRef>;

    /// Fetch the bytes behind an image URL with a plain `GET`
    async fn fetch(&self, url: &str) -> Result<FetchedImage>;
}

#[async_trait]
impl ImageService for PictoClient {
    async fn generate(&self, prompt: &str) -> Result<ImageRef> {
        Self::generate(self, prompt).await
    }

    async fn remove_background(&self, image: &SelectedImage, background_color: &str) -> Result<ImageRef> {
        Self::remove_background(self, image, background_color).await
    }

    async fn fetch(&self, url: &str) -> Result<FetchedImage> {
        Self::fetch(self, url).await
    }
}

#[async_trait]
impl<T: ImageService + ?Sized> ImageService for Arc<T> {
    async fn generate(&self, prompt: &str) -> Result<ImageRef> {
        (**self).generate(prompt).await
    }

    async fn remove_background(&self, image: &SelectedImage, background_color: &str) -> Result<ImageRef> {
        (**self).remove_background(image, background_color).await
    }

    async fn fetch(&self, url: &str) -> Result<FetchedImage> {
        (**self).fetch(url).await
    }
}
