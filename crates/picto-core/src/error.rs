use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Trait for domain errors that can be converted to HTTP responses
///
/// Implemented by each feature crate's error type. Keeps the wire shape of
/// error bodies identical across the generate, upload and remove-background
/// endpoints without tying domain errors to axum.
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Machine-readable error kind (e.g. `validation_error`)
    fn error_type(&self) -> &str;

    /// Message safe to show to end users
    fn client_message(&self) -> String;
}

/// JSON body returned for every failed API request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message
    pub message: String,
    /// Machine-readable error kind
    #[serde(rename = "type", default)]
    pub error_type: String,
}

impl ErrorBody {
    /// Build the body for a domain error
    pub fn from_error<E: HttpError + ?Sized>(error: &E) -> Self {
        Self {
            message: error.client_message(),
            error_type: error.error_type().to_string(),
        }
    }
}
