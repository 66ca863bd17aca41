use async_trait::async_trait;
use picto_core::ImageRef;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::ImageGenProvider;
use crate::error::{ImageGenError, Result};

const DEFAULT_BASE_URL: &str = "https://modelslab.com/api/v6";
const DEFAULT_MODEL: &str = "sdxl";
const DEFAULT_STEPS: u32 = 20;
const DEFAULT_GUIDANCE_SCALE: f32 = 7.5;
const DEFAULT_ASPECT_RATIO: &str = "1:1";

const GENERIC_FAILURE: &str = "Failed to generate image";
const NO_OUTPUT: &str = "No image generated";

/// `ModelsLab` realtime text2img provider
pub(crate) struct ModelsLabProvider {
    client: Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    steps: u32,
    guidance_scale: f32,
    aspect_ratio: String,
}

impl ModelsLabProvider {
    pub fn new(client: Client, api_key: SecretString, config: &picto_config::ImageGenProviderConfig) -> Self {
        Self {
            client,
            api_key,
            base_url: config.base_url.clone().unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: config.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            steps: config.steps.unwrap_or(DEFAULT_STEPS),
            guidance_scale: config.guidance_scale.unwrap_or(DEFAULT_GUIDANCE_SCALE),
            aspect_ratio: config
                .aspect_ratio
                .clone()
                .unwrap_or_else(|| DEFAULT_ASPECT_RATIO.to_string()),
        }
    }
}

/// Wire format for the text2img request; the API key travels in the body
#[derive(Serialize)]
struct Text2ImgRequest<'a> {
    key: &'a str,
    prompt: &'a str,
    model_id: &'a str,
    samples: u32,
    steps: u32,
    aspect_ratio: &'a str,
    guidance_scale: f32,
    seed: i64,
}

#[derive(Debug, Deserialize)]
struct Text2ImgResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<serde_json::Value>,
    #[serde(default)]
    output: Option<Vec<serde_json::Value>>,
}

impl Text2ImgResponse {
    /// Provider message, which is a plain string or an object of field errors
    fn message(&self) -> Option<String> {
        match self.message.as_ref()? {
            serde_json::Value::String(text) if text.trim().is_empty() => None,
            serde_json::Value::String(text) => Some(text.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    fn into_image(self) -> Result<ImageRef> {
        match self.status.as_deref() {
            Some("error") => Err(ImageGenError::Provider {
                status: None,
                message: self.message().unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            }),
            Some("success") => self
                .output
                .unwrap_or_default()
                .into_iter()
                .find_map(|entry| entry.as_str().filter(|url| !url.is_empty()).map(ImageRef::url))
                .ok_or_else(no_output),
            _ => Err(no_output()),
        }
    }
}

fn no_output() -> ImageGenError {
    ImageGenError::Provider {
        status: None,
        message: NO_OUTPUT.to_string(),
    }
}

/// Message for a non-2xx answer, preferring the provider's own wording
fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<Text2ImgResponse>(body)
        .ok()
        .and_then(|response| response.message())
        .unwrap_or_else(|| GENERIC_FAILURE.to_string())
}

#[async_trait]
impl ImageGenProvider for ModelsLabProvider {
    async fn generate(&self, prompt: &str) -> Result<ImageRef> {
        let url = format!("{}/realtime/text2img", self.base_url.trim_end_matches('/'));

        let wire_request = Text2ImgRequest {
            key: self.api_key.expose_secret(),
            prompt,
            model_id: &self.model,
            samples: 1,
            steps: self.steps,
            aspect_ratio: &self.aspect_ratio,
            guidance_scale: self.guidance_scale,
            seed: -1,
        };

        tracing::debug!(provider = %self.name(), model = %self.model, "sending text2img request");

        let response = self
            .client
            .post(&url)
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
            tracing::error!(provider = %self.name(), status = %status, "ModelsLab API error");

            return Err(ImageGenError::Provider {
                status: Some(status.as_u16()),
                message: error_message(&body),
            });
        }

        let wire_response: Text2ImgResponse = serde_json::from_slice(&body).map_err(|e| {
            tracing::error!(provider = %self.name(), error = %e, "failed to parse ModelsLab response");
            ImageGenError::Provider {
                status: None,
                message: GENERIC_FAILURE.to_string(),
            }
        })?;

        let image = wire_response.into_image()?;

        tracing::debug!(provider = %self.name(), "text2img request complete");

        Ok(image)
    }

    fn name(&self) -> &str {
        "modelslab"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<ImageRef> {
        serde_json::from_str::<Text2ImgResponse>(json).unwrap().into_image()
    }

    fn provider_message(result: Result<ImageRef>) -> String {
        match result {
            Err(ImageGenError::Provider { message, .. }) => message,
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[test]
    fn success_yields_first_output_url() {
        let image = parse(r#"{"status":"success","output":["https://cdn.example/img1.png","https://cdn.example/img2.png"]}"#)
            .unwrap();
        assert_eq!(image, ImageRef::url("https://cdn.example/img1.png"));
    }

    #[test]
    fn error_status_carries_provider_message() {
        let message = provider_message(parse(r#"{"status":"error","message":"Invalid API key"}"#));
        assert_eq!(message, "Invalid API key");
    }

    #[test]
    fn error_status_without_message_uses_generic_text() {
        let message = provider_message(parse(r#"{"status":"error"}"#));
        assert_eq!(message, "Failed to generate image");
    }

    #[test]
    fn structured_error_message_is_flattened() {
        let message = provider_message(parse(r#"{"status":"error","message":{"prompt":["required"]}}"#));
        assert!(message.contains("prompt"));
    }

    #[test]
    fn success_without_output_is_no_image() {
        let message = provider_message(parse(r#"{"status":"success","output":[]}"#));
        assert_eq!(message, "No image generated");
    }

    #[test]
    fn processing_status_is_no_image() {
        let message = provider_message(parse(r#"{"status":"processing","eta":12,"output":[]}"#));
        assert_eq!(message, "No image generated");
    }

    #[test]
    fn non_success_body_prefers_provider_message() {
        assert_eq!(error_message(br#"{"status":"error","message":"Out of credits"}"#), "Out of credits");
        assert_eq!(error_message(b"<html>bad gateway</html>"), "Failed to generate image");
    }

    #[test]
    fn request_body_matches_wire_format() {
        let body = serde_json::to_value(Text2ImgRequest {
            key: "k",
            prompt: "a red fox",
            model_id: DEFAULT_MODEL,
            samples: 1,
            steps: DEFAULT_STEPS,
            aspect_ratio: DEFAULT_ASPECT_RATIO,
            guidance_scale: DEFAULT_GUIDANCE_SCALE,
            seed: -1,
        })
        .unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "key": "k",
                "prompt": "a red fox",
                "model_id": "sdxl",
                "samples": 1,
                "steps": 20,
                "aspect_ratio": "1:1",
                "guidance_scale": 7.5,
                "seed": -1
            })
        );
    }
}
