use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An image picked by the user, ready to send
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedImage {
    /// Original file name
    pub filename: String,
    /// MIME type (e.g. `image/png`)
    pub content_type: String,
    /// File contents
    pub bytes: Vec<u8>,
}

impl SelectedImage {
    pub fn new(filename: impl Into<String>, content_type: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}

impl std::fmt::Debug for SelectedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectedImage")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Metadata the server recorded for an upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub id: i64,
    pub filename: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// Bytes fetched from an image location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Serialize)]
pub(crate) struct GenerateRequest<'a> {
    pub prompt: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct GenerateResponse {
    pub url: String,
}
