use reqwest::multipart::{Form, Part};
use url::Url;

use picto_core::ImageRef;

use crate::{
    error::{ClientError, Result},
    types::{FetchedImage, GenerateRequest, GenerateResponse, ImageRecord, SelectedImage},
};

/// Typed client for the Picto server
#[derive(Debug, Clone)]
pub struct PictoClient {
    base_url: Url,
    http: reqwest::Client,
}

impl PictoClient {
    /// Create a new client pointing at the given base URL
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| ClientError::Config(format!("invalid base URL: {e}")))?;

        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    /// Use a preconfigured HTTP client (timeouts, proxies, TLS roots)
    #[must_use]
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Get the base URL
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Generate an image from a text prompt
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the returned source cannot be parsed
    pub async fn generate(&self, prompt: &str) -> Result<ImageRef> {
        let url = make_url(&self.base_url, "/api/images/generate");

        let response = self.http.post(url).json(&GenerateRequest { prompt }).send().await?;

        let body: GenerateResponse = handle_error(response)
            .await?
            .json()
            .await
            .map_err(decode_error)?;

        ImageRef::parse(&body.url).map_err(|e| ClientError::Parse(e.to_string()))
    }

    /// Upload an image and get back the record the server stored for it
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed
    pub async fn upload(&self, image: &SelectedImage) -> Result<ImageRecord> {
        let url = make_url(&self.base_url, "/api/images/upload");
        let form = Form::new().part("image", image_part(image)?);

        let response = self.http.post(url).multipart(form).send().await?;

        handle_error(response)
            .await?
            .json()
            .await
            .map_err(decode_error)
    }

    /// Remove the background of an image, filling it with `background_color`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails
    pub async fn remove_background(&self, image: &SelectedImage, background_color: &str) -> Result<ImageRef> {
        let url = make_url(&self.base_url, "/api/images/remove-background");
        let form = Form::new()
            .part("image", image_part(image)?)
            .text("bgColor", background_color.to_owned());

        let response = self.http.post(url).multipart(form).send().await?;
        let fetched = read_image(handle_error(response).await?).await?;

        Ok(ImageRef::inline(fetched.content_type, fetched.bytes))
    }

    /// Fetch image bytes from a URL with a plain `GET`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server answers non-2xx
    pub async fn fetch(&self, url: &str) -> Result<FetchedImage> {
        let response = self.http.get(url).send().await?;
        read_image(handle_error(response).await?).await
    }

    /// Check that the server is up
    ///
    /// # Errors
    ///
    /// Returns an error if the health endpoint does not answer 2xx
    pub async fn health(&self) -> Result<()> {
        let url = make_url(&self.base_url, "/health");
        handle_error(self.http.get(url).send().await?).await?;
        Ok(())
    }
}

fn image_part(image: &SelectedImage) -> Result<Part> {
    Part::bytes(image.bytes.clone())
        .file_name(image.filename.clone())
        .mime_str(&image.content_type)
        .map_err(|e| ClientError::Config(format!("invalid mime type: {e}")))
}

async fn read_image(response: reqwest::Response) -> Result<FetchedImage> {
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_owned();

    let bytes = response.bytes().await?.to_vec();

    Ok(FetchedImage { content_type, bytes })
}

/// A body that arrived late is a timeout; anything else is a parse failure
fn decode_error(error: reqwest::Error) -> ClientError {
    if error.is_timeout() {
        ClientError::Timeout
    } else {
        ClientError::Parse(error.to_string())
    }
}

/// Build a URL from the base and a path
fn make_url(base_url: &Url, path: &str) -> Url {
    let mut url = base_url.clone();
    url.set_path(path);
    url
}

/// Check an HTTP response for errors
async fn handle_error(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let (error_type, message) = parse_error_body(&body);

    tracing::debug!(status = status.as_u16(), error_type = %error_type, "picto request failed");

    Err(ClientError::Api {
        status: status.as_u16(),
        error_type,
        message,
    })
}

/// Parse an error response body into (type, message)
fn parse_error_body(body: &str) -> (String, String) {
    serde_json::from_str::<picto_core::ErrorBody>(body).map_or_else(
        |_| ("unknown".to_owned(), body.trim().to_owned()),
        |error| {
            let error_type = if error.error_type.is_empty() {
                "unknown".to_owned()
            } else {
                error.error_type
            };
            (error_type, error.message)
        },
    )
}
