//! Error types for the portone-rs library.
//!
//! Every fallible operation in the crate returns [`Result`], whose error side is
//! [`PortoneError`].

use thiserror::Error;

/// Main error type for PortOne API operations.
#[derive(Error, Debug)]
pub enum PortoneError {
    /// The HTTP call could not complete (DNS, connection, timeout)
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// A request body could not be encoded or a response body did not match
    /// the expected envelope
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error parsing URL
    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),

    /// The access token cannot be carried in an HTTP header
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// A decoded response carried a value the client cannot use
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Acquiring an access token failed, so the original request was never sent
    #[error("Authentication failed: {0}")]
    Authentication(#[source] Box<PortoneError>),

    /// The API answered with a non-success envelope where a payload was required
    #[error("API error (code {code}): {message}")]
    Api {
        /// Numeric status code from the envelope
        code: i64,
        /// Message from the envelope
        message: String,
    },
}

impl PortoneError {
    /// Returns true if this error came out of the token refresh step.
    pub fn is_authentication(&self) -> bool {
        matches!(self, PortoneError::Authentication(_))
    }
}

/// Result type alias for PortOne operations.
pub type Result<T> = std::result::Result<T, PortoneError>;
