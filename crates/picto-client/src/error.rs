/// Client-specific result type
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors from the Picto client
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// The request did not complete in time
    #[error("request timed out")]
    Timeout,

    /// Server returned an error response
    #[error("{status} {error_type}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error type identifier
        error_type: String,
        /// Human-readable error message
        message: String,
    },

    /// Failed to parse response
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(error)
        }
    }
}

impl ClientError {
    /// Message suitable for showing to the person who submitted the request
    ///
    /// Never empty. Timeouts read differently from anything a provider says.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } if !message.trim().is_empty() => message.clone(),
            Self::Api { status, .. } => format!("Request failed with status {status}"),
            Self::Timeout => "The request timed out. Please try again.".to_owned(),
            Self::Http(_) => "Could not reach the Picto server".to_owned(),
            Self::Parse(_) => "Unexpected response from the Picto server".to_owned(),
            Self::Config(message) => message.clone(),
        }
    }

    /// Whether the failure was a timeout on either side of the server
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout | Self::Api { status: 504, .. })
    }
}
