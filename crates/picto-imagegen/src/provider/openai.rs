use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use picto_core::ImageRef;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::ImageGenProvider;
use crate::error::{ImageGenError, Result};

/// Default `OpenAI` API base URL
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "dall-e-3";
const DEFAULT_SIZE: &str = "1024x1024";

/// `OpenAI` image generation provider
pub(crate) struct OpenAiImageGenProvider {
    client: Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    size: String,
}

impl OpenAiImageGenProvider {
    pub fn new(client: Client, api_key: SecretString, config: &picto_config::ImageGenProviderConfig) -> Self {
        Self {
            client,
            api_key,
            base_url: config.base_url.clone().unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: config.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            size: config.size.clone().unwrap_or_else(|| DEFAULT_SIZE.to_string()),
        }
    }
}

/// Wire format for the `OpenAI` image generation API request
#[derive(Serialize)]
struct OpenAiImageRequest<'a> {
    prompt: &'a str,
    model: &'a str,
    n: u32,
    size: &'a str,
}

/// Wire format for the `OpenAI` image generation API response
#[derive(Deserialize)]
struct OpenAiImageResponse {
    #[serde(default)]
    data: Vec<OpenAiImageData>,
}

#[derive(Deserialize)]
struct OpenAiImageData {
    url: Option<String>,
    b64_json: Option<String>,
}

#[derive(Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

#[derive(Deserialize)]
struct OpenAiErrorDetail {
    message: String,
}

impl OpenAiImageResponse {
    fn into_image(self) -> Result<ImageRef> {
        let Some(first) = self.data.into_iter().next() else {
            return Err(provider_error("No image generated"));
        };

        if let Some(url) = first.url.filter(|url| !url.is_empty()) {
            return Ok(ImageRef::url(url));
        }

        match first.b64_json {
            Some(encoded) => STANDARD
                .decode(encoded.as_bytes())
                .map(|data| ImageRef::inline("image/png", data))
                .map_err(|_| provider_error("Provider returned malformed image data")),
            None => Err(provider_error("No image generated")),
        }
    }
}

fn provider_error(message: &str) -> ImageGenError {
    ImageGenError::Provider {
        status: None,
        message: message.to_string(),
    }
}

fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<OpenAiErrorResponse>(body)
        .map(|response| response.error.message)
        .ok()
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| "Failed to generate image".to_string())
}

#[async_trait]
impl ImageGenProvider for OpenAiImageGenProvider {
    async fn generate(&self, prompt: &str) -> Result<ImageRef> {
        let url = format!("{}/images/generations", self.base_url.trim_end_matches('/'));

        let wire_request = OpenAiImageRequest {
            prompt,
            model: &self.model,
            n: 1,
            size: &self.size,
        };

        tracing::debug!(provider = %self.name(), model = %self.model, "sending image generation request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key.expose_secret()))
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| ImageGenError::from_transport(self.name(), &e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ImageGenError::from_transport(self.name(), &e))?;

        if !status.is_success() {
            tracing::error!(provider = %self.name(), status = %status, "OpenAI image generation API error");

            return Err(ImageGenError::Provider {
                status: Some(status.as_u16()),
                message: error_message(&body),
            });
        }

        let wire_response: OpenAiImageResponse = serde_json::from_slice(&body).map_err(|e| {
            tracing::error!(
                provider = %self.name(),
                error = %e,
                "failed to parse OpenAI image generation response"
            );
            provider_error("Failed to generate image")
        })?;

        let image = wire_response.into_image()?;

        tracing::debug!(provider = %self.name(), "image generation request complete");

        Ok(image)
    }

    fn name(&self) -> &str {
        "openai"
    }
}
