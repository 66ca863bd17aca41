use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use picto_core::{ErrorBody, HttpError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BgRemoveError>;

/// Background-removal gateway errors with their HTTP status codes
#[derive(Debug, Error)]
pub enum BgRemoveError {
    /// No image, an empty image, or an invalid colour
    #[error("{0}")]
    Validation(String),

    /// No background-removal provider is bound in configuration
    #[error("Background removal is not configured")]
    NotConfigured,

    /// Provider rejected the request or returned an unusable body
    #[error("Provider error ({status:?}): {message}")]
    Provider { status: Option<u16>, message: String },

    /// The provider could not be reached
    #[error("Connection error: {0}")]
    Network(String),

    /// The provider call exceeded the configured timeout
    #[error("Background removal timed out")]
    Timeout,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl BgRemoveError {
    pub(crate) fn from_transport(provider: &str, error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            tracing::error!(provider, "background removal request timed out");
            Self::Timeout
        } else {
            tracing::error!(provider, error = %error, "background removal request failed");
            Self::Network(error.to_string())
        }
    }
}

impl HttpError for BgRemoveError {
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
            Self::Network(_) => "Failed to reach the background removal provider".to_string(),
            Self::Config(_) => "Internal server error".to_string(),
            Self::NotConfigured | Self::Timeout => self.to_string(),
        }
    }
}

impl IntoResponse for BgRemoveError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorBody::from_error(&self))).into_response()
    }
}
