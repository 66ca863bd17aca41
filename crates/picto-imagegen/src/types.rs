use serde::{Deserialize, Serialize};

/// Body of `POST /api/images/generate`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GenerateRequest {
    /// Text description of the desired image
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Successful generation result
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GenerateResponse {
    /// Image source string: a remote URL or a `data:` URI
    pub url: String,
}
