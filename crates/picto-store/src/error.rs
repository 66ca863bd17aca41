use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use picto_core::{ErrorBody, HttpError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Record store and upload errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Upload carried no file, or an empty one
    #[error("No image file provided")]
    MissingFile,

    /// Upload body could not be read
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    /// The persistence medium rejected or could not take the write
    #[error("Storage error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migrations failed at start-up
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// In-memory store lock was poisoned
    #[error("Storage unavailable")]
    Unavailable,
}

impl HttpError for StoreError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingFile | Self::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) | Self::Migration(_) | Self::Unavailable => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::MissingFile | Self::InvalidUpload(_) => "validation_error",
            Self::Database(_) | Self::Migration(_) | Self::Unavailable => "storage_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::MissingFile | Self::InvalidUpload(_) => self.to_string(),
            Self::Database(_) | Self::Migration(_) | Self::Unavailable => "Failed to upload image".to_string(),
        }
    }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        if self.status_code().is_server_error() {
            tracing::error!(error = %self, "image upload failed");
        }

        (self.status_code(), Json(ErrorBody::from_error(&self))).into_response()
    }
}
