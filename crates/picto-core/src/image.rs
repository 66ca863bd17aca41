use std::fmt;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A resolvable image produced by a provider
///
/// Either a remote location the caller can fetch, or the image bytes
/// themselves. Both forms can be rendered by anything that accepts an image
/// source string (see [`ImageRef::to_src`]).
#[derive(Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// Remote `http`/`https` location
    Url(String),
    /// Image bytes carried inline
    Inline {
        /// MIME type of `data` (e.g. `image/png`)
        content_type: String,
        /// Encoded image bytes
        data: Vec<u8>,
    },
}

/// Errors produced when parsing an image source string
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ImageRefError {
    #[error("image source is empty")]
    Empty,
    #[error("unsupported image source: {0}")]
    Unsupported(String),
    #[error("malformed data URI: {0}")]
    MalformedDataUri(String),
}

impl ImageRef {
    /// Reference a remote image
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    /// Wrap image bytes
    pub fn inline(content_type: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self::Inline {
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    /// Remote location, if this is a URL reference
    pub fn as_url(&self) -> Option<&str> {
        match self {
            Self::Url(url) => Some(url),
            Self::Inline { .. } => None,
        }
    }

    /// Render as an image source string
    ///
    /// URLs are returned unchanged; inline bytes become a base64 `data:` URI.
    pub fn to_src(&self) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::Inline { content_type, data } => {
                format!("data:{content_type};base64,{}", STANDARD.encode(data))
            }
        }
    }

    /// Parse an image source string produced by [`ImageRef::to_src`]
    ///
    /// # Errors
    ///
    /// Returns an error for empty input, non-HTTP URLs, or `data:` URIs that
    /// are not base64 encoded
    pub fn parse(src: &str) -> Result<Self, ImageRefError> {
        let src = src.trim();

        if src.is_empty() {
            return Err(ImageRefError::Empty);
        }

        if let Some(rest) = src.strip_prefix("data:") {
            let (header, payload) = rest
                .split_once(',')
                .ok_or_else(|| ImageRefError::MalformedDataUri("missing ',' separator".to_string()))?;

            let content_type = header
                .strip_suffix(";base64")
                .ok_or_else(|| ImageRefError::MalformedDataUri("only base64 payloads are supported".to_string()))?;

            if content_type.is_empty() {
                return Err(ImageRefError::MalformedDataUri("missing content type".to_string()));
            }

            let data = STANDARD
                .decode(payload)
                .map_err(|e| ImageRefError::MalformedDataUri(e.to_string()))?;

            return Ok(Self::inline(content_type, data));
        }

        let parsed = url::Url::parse(src).map_err(|_| ImageRefError::Unsupported(src.to_string()))?;

        match parsed.scheme() {
            "http" | "https" => Ok(Self::Url(src.to_string())),
            _ => Err(ImageRefError::Unsupported(src.to_string())),
        }
    }
}

impl fmt::Debug for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.debug_tuple("Url").field(url).finish(),
            Self::Inline { content_type, data } => f
                .debug_struct("Inline")
                .field("content_type", content_type)
                .field("len", &data.len())
                .finish(),
        }
    }
}

impl Serialize for ImageRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_src())
    }
}

impl<'de> Deserialize<'de> for ImageRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let src = String::deserialize(deserializer)?;
        Self::parse(&src).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_source_is_unchanged() {
        let image = ImageRef::url("https://cdn.example/img1.png");
        assert_eq!(image.to_src(), "https://cdn.example/img1.png");
        assert_eq!(image.as_url(), Some("https://cdn.example/img1.png"));
    }

    #[test]
    fn inline_source_is_a_data_uri() {
        let image = ImageRef::inline("image/png", vec![0x89, b'P', b'N', b'G']);
        assert_eq!(image.to_src(), "data:image/png;base64,iVBORw==");
        assert!(image.as_url().is_none());
    }

    #[test]
    fn stored_sources_resolve_to_the_same_image() {
        let images = [
            ImageRef::url("https://cdn.example/img1.png"),
            ImageRef::url("http://localhost:8080/a.webp?sig=abc"),
            ImageRef::inline("image/png", b"not really a png".to_vec()),
            ImageRef::inline("image/jpeg", Vec::new()),
        ];

        for image in images {
            let stored = image.to_src();
            assert_eq!(ImageRef::parse(&stored).unwrap(), image, "source: {stored}");
        }
    }

    #[test]
    fn empty_source_is_rejected() {
        assert_eq!(ImageRef::parse("   "), Err(ImageRefError::Empty));
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        assert!(matches!(
            ImageRef::parse("file:///etc/passwd"),
            Err(ImageRefError::Unsupported(_))
        ));
        assert!(matches!(ImageRef::parse("placeholder-url"), Err(ImageRefError::Unsupported(_))));
    }

    #[test]
    fn data_uri_without_base64_is_rejected() {
        assert!(matches!(
            ImageRef::parse("data:image/svg+xml,<svg/>"),
            Err(ImageRefError::MalformedDataUri(_))
        ));
    }

    #[test]
    fn data_uri_with_bad_payload_is_rejected() {
        assert!(matches!(
            ImageRef::parse("data:image/png;base64,@@@"),
            Err(ImageRefError::MalformedDataUri(_))
        ));
    }

    #[test]
    fn serde_uses_source_strings() {
        let image = ImageRef::url("https://cdn.example/img1.png");
        let json = serde_json::to_string(&image).unwrap();
        assert_eq!(json, "\"https://cdn.example/img1.png\"");

        let back: ImageRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, image);
    }
}
