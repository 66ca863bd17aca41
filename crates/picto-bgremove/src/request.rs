use axum::extract::{FromRequest, Multipart, Request};

use crate::{
    error::BgRemoveError,
    types::{BackgroundColor, RemovalRequest},
};

const DEFAULT_FILENAME: &str = "image.png";
const DEFAULT_CONTENT_TYPE: &str = "image/png";

/// Extractor for the remove-background multipart form
///
/// Fields: `image` (required, non-empty file) and `bgColor` (optional).
/// Unknown fields are skipped.
pub struct ExtractRemoval(pub RemovalRequest);

impl<S> FromRequest<S> for ExtractRemoval
where
    S: Send + Sync,
{
    type Rejection = BgRemoveError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(request, state)
            .await
            .map_err(|e| BgRemoveError::Validation(e.body_text()))?;

        let mut image: Option<Vec<u8>> = None;
        let mut filename = DEFAULT_FILENAME.to_string();
        let mut content_type = DEFAULT_CONTENT_TYPE.to_string();
        let mut background_color = BackgroundColor::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| BgRemoveError::Validation(format!("Failed to parse multipart form: {e}")))?
        {
            let field_name = field.name().unwrap_or_default().to_string();

            match field_name.as_str() {
                "image" => {
                    if let Some(name) = field.file_name().filter(|name| !name.is_empty()) {
                        filename = name.to_string();
                    }
                    if let Some(ct) = field.content_type() {
                        content_type = ct.to_string();
                    }
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| BgRemoveError::Validation(format!("Failed to read image data: {e}")))?;
                    image = Some(bytes.to_vec());
                }
                "bgColor" => {
                    let raw = field
                        .text()
                        .await
                        .map_err(|e| BgRemoveError::Validation(format!("Failed to read bgColor field: {e}")))?;
                    if !raw.trim().is_empty() {
                        background_color = raw
                            .parse()
                            .map_err(|e: crate::types::InvalidColor| BgRemoveError::Validation(e.to_string()))?;
                    }
                }
                _ => {}
            }
        }

        let image = image
            .filter(|bytes| !bytes.is_empty())
            .ok_or_else(|| BgRemoveError::Validation("No image file provided".to_string()))?;

        Ok(Self(RemovalRequest {
            image,
            filename,
            content_type,
            background_color,
        }))
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;

    use super::*;

    const BOUNDARY: &str = "picto-boundary";

    fn multipart_request(parts: &[(&str, Option<&str>, &str)]) -> Request {
        let mut body = String::new();
        for (name, filename, value) in parts {
            body.push_str(&format!("--{BOUNDARY}\r\n"));
            match filename {
                Some(filename) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: image/jpeg\r\n\r\n"
                )),
                None => body.push_str(&format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")),
            }
            body.push_str(value);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));

        http::Request::builder()
            .method("POST")
            .uri("/api/images/remove-background")
            .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(body))
            .unwrap()
    }

    async fn extract(request: Request) -> Result<RemovalRequest, BgRemoveError> {
        ExtractRemoval::from_request(request, &()).await.map(|ExtractRemoval(r)| r)
    }

    #[tokio::test]
    async fn image_and_colour_are_read() {
        let request = multipart_request(&[("image", Some("cat.jpg"), "JPEGDATA"), ("bgColor", None, "#00FF00")]);

        let removal = extract(request).await.unwrap();

        assert_eq!(removal.image, b"JPEGDATA");
        assert_eq!(removal.filename, "cat.jpg");
        assert_eq!(removal.content_type, "image/jpeg");
        assert_eq!(removal.background_color.as_str(), "#00ff00");
    }

    #[tokio::test]
    async fn colour_defaults_to_white() {
        let request = multipart_request(&[("image", Some("cat.jpg"), "JPEGDATA")]);

        let removal = extract(request).await.unwrap();

        assert_eq!(removal.background_color, BackgroundColor::default());
    }

    #[tokio::test]
    async fn missing_image_is_rejected() {
        let request = multipart_request(&[("bgColor", None, "#ffffff")]);

        let err = extract(request).await.unwrap_err();

        assert_eq!(err.to_string(), "No image file provided");
    }

    #[tokio::test]
    async fn empty_image_is_rejected() {
        let request = multipart_request(&[("image", Some("empty.png"), "")]);

        let err = extract(request).await.unwrap_err();

        assert_eq!(err.to_string(), "No image file provided");
    }

    #[tokio::test]
    async fn invalid_colour_is_rejected() {
        let request = multipart_request(&[("image", Some("cat.jpg"), "JPEGDATA"), ("bgColor", None, "purple")]);

        let err = extract(request).await.unwrap_err();

        assert!(matches!(err, BgRemoveError::Validation(ref m) if m.contains("purple")));
    }

    #[tokio::test]
    async fn non_multipart_body_is_rejected() {
        let request = http::Request::builder()
            .method("POST")
            .uri("/api/images/remove-background")
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap();

        let err = extract(request).await.unwrap_err();

        assert!(matches!(err, BgRemoveError::Validation(_)));
    }
}
