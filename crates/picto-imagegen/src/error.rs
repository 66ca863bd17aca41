use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use picto_core::{ErrorBody, HttpError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImageGenError>;

/// Text-to-image gateway errors with their HTTP status codes
#[derive(Debug, Error)]
pub enum ImageGenError {
    /// Required input is absent or malformed
    #[error("{0}")]
    Validation(String),

    /// No text-to-image provider is bound in configuration
    #[error("Image generation is not configured")]
    NotConfigured,

    /// Provider answered, but not with an image
    ///
    /// `status` is the upstream HTTP status when the failure was a non-2xx
    /// response, `None` when a 2xx body reported an error or had no output.
    #[error("Provider error ({status:?}): {message}")]
    Provider { status: Option<u16>, message: String },

    /// The provider could not be reached
    #[error("Connection error: {0}")]
    Network(String),

    /// The provider call exceeded the configured timeout
    #[error("Image generation timed out")]
    Timeout,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ImageGenError {
    /// Map a failed `reqwest` call into a timeout or a network error
    pub(crate) fn from_transport(provider: &str, error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            tracing::error!(provider, "image generation request timed out");
            Self::Timeout
        } else {
            tracing::error!(provider, error = %error, "image generation request failed");
            Self::Network(error.to_string())
        }
    }
}

impl HttpError for ImageGenError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::Provider { .. } | Self::Network(_) | Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::NotConfigured => "not_configured",
            Self::Provider { .. } => "provider_error",
            Self::Network(_) => "network_error",
            Self::Timeout => "timeout",
            Self::Config(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Validation(message) | Self::Provider { message, .. } => message.clone(),
            Self::Network(_) => "Failed to reach the image generation provider".to_string(),
            Self::Config(_) => "Internal server error".to_string(),
            Self::NotConfigured | Self::Timeout => self.to_string(),
        }
    }
}

impl IntoResponse for ImageGenError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorBody::from_error(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(
            ImageGenError::Validation("Prompt is required".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ImageGenError::NotConfigured.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(ImageGenError::Timeout.status_code(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            ImageGenError::Provider {
                status: Some(402),
                message: "Out of credits".into()
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ImageGenError::Network("dns".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn provider_message_reaches_the_client() {
        let error = ImageGenError::Provider {
            status: None,
            message: "Failed to generate image".into(),
        };
        assert_eq!(error.client_message(), "Failed to generate image");
    }

    #[test]
    fn network_details_stay_internal() {
        let error = ImageGenError::Network("tcp connect error: 10.0.0.3:443".into());
        assert!(!error.client_message().contains("10.0.0.3"));
    }

    #[test]
    fn timeout_message_differs_from_provider_message() {
        let timeout = ImageGenError::Timeout.client_message();
        let provider = ImageGenError::Provider {
            status: None,
            message: "Failed to generate image".into(),
        }
        .client_message();
        assert_ne!(timeout, provider);
        assert_eq!(timeout, "Image generation timed out");
    }
}
