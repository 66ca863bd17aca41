use std::{fmt, str::FromStr};

/// Background colour applied behind the cut-out subject
///
/// Stored as lowercase `#rrggbb` or `#rgb`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundColor(String);

impl BackgroundColor {
    /// Hex digits without the leading `#`, as remove.bg expects them
    pub fn hex(&self) -> &str {
        self.0.trim_start_matches('#')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for BackgroundColor {
    fn default() -> Self {
        Self("#ffffff".to_string())
    }
}

impl fmt::Display for BackgroundColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error for a colour that is not `#rgb` or `#rrggbb`
#[derive(Debug, thiserror::Error)]
#[error("Invalid background colour '{0}', expected #rgb or #rrggbb")]
pub struct InvalidColor(String);

impl FromStr for BackgroundColor {
    type Err = InvalidColor;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);

        if !matches!(digits.len(), 3 | 6) || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(InvalidColor(raw.to_string()));
        }

        Ok(Self(format!("#{}", digits.to_ascii_lowercase())))
    }
}

/// One background-removal job as received from the client
#[derive(Debug, Clone)]
pub struct RemovalRequest {
    /// Raw bytes of the source image
    pub image: Vec<u8>,
    /// File name reported by the client
    pub filename: String,
    /// MIME type of `image`
    pub content_type: String,
    /// Colour placed behind the subject
    pub background_color: BackgroundColor,
}
