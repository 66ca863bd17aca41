use async_trait::async_trait;
use picto_core::ImageRef;
use reqwest::{
    Client,
    multipart::{Form, Part},
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::BackgroundRemover;
use crate::{
    error::{BgRemoveError, Result},
    types::RemovalRequest,
};

const DEFAULT_BASE_URL: &str = "https://api.remove.bg/v1.0";
const DEFAULT_SIZE: &str = "auto";
const GENERIC_FAILURE: &str = "Failed to remove background";

/// remove.bg provider
pub(crate) struct RemoveBgProvider {
    client: Client,
    api_key: SecretString,
    base_url: String,
    size: String,
}

impl RemoveBgProvider {
    pub fn new(client: Client, api_key: SecretString, config: &picto_config::BgRemoveProviderConfig) -> Self {
        Self {
            client,
            api_key,
            base_url: config.base_url.clone().unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            size: config.size.clone().unwrap_or_else(|| DEFAULT_SIZE.to_string()),
        }
    }
}

#[derive(Deserialize)]
struct RemoveBgErrorResponse {
    #[serde(default)]
    errors: Vec<RemoveBgError>,
}

#[derive(Deserialize)]
struct RemoveBgError {
    title: String,
}

/// Join the error titles of a non-2xx answer
fn error_message(body: &[u8]) -> String {
    let titles: Vec<String> = serde_json::from_slice::<RemoveBgErrorResponse>(body)
        .map(|response| response.errors.into_iter().map(|e| e.title).collect())
        .unwrap_or_default();

    if titles.is_empty() {
        GENERIC_FAILURE.to_string()
    } else {
        titles.join("; ")
    }
}

#[async_trait]
impl BackgroundRemover for RemoveBgProvider {
    async fn remove_background(&self, request: RemovalRequest) -> Result<ImageRef> {
        let url = format!("{}/removebg", self.base_url.trim_end_matches('/'));

        tracing::debug!(
            provider = %self.name(),
            bytes = request.image.len(),
            bg_color = %request.background_color,
            "sending background removal request"
        );

        let image_part = Part::bytes(request.image)
            .file_name(request.filename)
            .mime_str(&request.content_type)
            .map_err(|e| BgRemoveError::Validation(format!("Invalid content type: {e}")))?;

        let form = Form::new()
            .part("image_file", image_part)
            .text("size", self.size.clone())
            .text("format", "png")
            .text("bg_color", request.background_color.hex().to_string());

        let response = self
            .client
            .post(&url)
            .header("X-Api-Key", self.api_key.expose_secret())
            .multipart(form)
            .send()
            .await
            .map_err(|e| BgRemoveError::from_transport(self.name(), &e))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/png")
            .to_string();

        let body = response
            .bytes()
            .await
            .map_err(|e| BgRemoveError::from_transport(self.name(), &e))?;

        if !status.is_success() {
            tracing::error!(provider = %self.name(), status = %status, "remove.bg API error");

            return Err(BgRemoveError::Provider {
                status: Some(status.as_u16()),
                message: error_message(&body),
            });
        }

        if body.is_empty() || !content_type.starts_with("image/") {
            tracing::error!(
                provider = %self.name(),
                content_type = %content_type,
                "remove.bg returned a non-image body"
            );

            return Err(BgRemoveError::Provider {
                status: None,
                message: GENERIC_FAILURE.to_string(),
            });
        }

        tracing::debug!(provider = %self.name(), bytes = body.len(), "background removal complete");

        Ok(ImageRef::inline(content_type, body.to_vec()))
    }

    fn name(&self) -> &str {
        "remove_bg"
    }
}
