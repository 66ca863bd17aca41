use std::sync::Arc;

use axum::extract::{FromRequest, Multipart, Request};

use crate::{
    error::{Result, StoreError},
    model::ImageRecord,
    store::ImageStore,
};

/// Name recorded when the client sends a file part without a file name
const DEFAULT_FILENAME: &str = "upload";

/// Upload service: records metadata for each accepted image
pub struct Server {
    store: Arc<dyn ImageStore>,
    placeholder_url: String,
}

impl Server {
    pub fn new(store: Arc<dyn ImageStore>, placeholder_url: impl Into<String>) -> Self {
        Self {
            store,
            placeholder_url: placeholder_url.into(),
        }
    }

    /// Record one uploaded image
    ///
    /// The bytes themselves are not kept; the record points at the
    /// configured placeholder location.
    pub async fn upload(&self, file: UploadedFile) -> Result<ImageRecord> {
        if file.data.is_empty() {
            return Err(StoreError::MissingFile);
        }

        let record = self.store.create(&file.filename, &self.placeholder_url).await?;

        tracing::debug!(id = record.id, bytes = file.data.len(), "image upload recorded");

        Ok(record)
    }
}

/// The `image` part of an upload form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Extractor for the upload multipart form
pub struct ExtractUpload(pub UploadedFile);

impl<S> FromRequest<S> for ExtractUpload
where
    S: Send + Sync,
{
    type Rejection = StoreError;

    async fn from_request(request: Request, state: &S) -> Result<Self> {
        // A request that is not a multipart form carries no file at all
        let mut multipart = Multipart::from_request(request, state).await.map_err(|e| {
            tracing::debug!(rejection = %e.body_text(), "upload is not a multipart form");
            StoreError::MissingFile
        })?;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| StoreError::InvalidUpload(e.to_string()))?
        {
            if field.name() != Some("image") {
                continue;
            }

            let filename = field
                .file_name()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .unwrap_or(DEFAULT_FILENAME)
                .to_string();

            let data = field
                .bytes()
                .await
                .map_err(|e| StoreError::InvalidUpload(e.to_string()))?;

            if data.is_empty() {
                return Err(StoreError::MissingFile);
            }

            return Ok(Self(UploadedFile {
                filename,
                data: data.to_vec(),
            }));
        }

        Err(StoreError::MissingFile)
    }
}
