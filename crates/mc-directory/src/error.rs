//! Directory error types.
//!
//! ## Security Note
//!
//! Error messages must not carry client secrets or access tokens.

use std::time::Duration;

use thiserror::Error;

/// Errors returned by directory clients.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Invalid client configuration.
    #[error("directory configuration error: {0}")]
    Configuration(String),

    /// A required credential was not supplied.
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    /// The token endpoint or the directory rejected our credentials.
    #[error("directory authentication failed: {0}")]
    Authentication(String),

    /// The directory could not be reached or returned a server error.
    #[error("directory unavailable: {0}")]
    Unavailable(String),

    /// The directory asked us to slow down.
    #[error("directory throttled the request")]
    Throttled {
        /// Delay requested by the `Retry-After` header, if any.
        retry_after: Option<Duration>,
    },

    /// The group or user has no directory record.
    #[error("not found in directory: {0}")]
    NotFound(String),

    /// The directory rejected the request.
    #[error("directory API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("malformed directory response: {0}")]
    Decode(String),

    /// Underlying HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl DirectoryError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates an authentication error.
    #[must_use]
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Creates an unavailable error.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Creates a decode error.
    #[must_use]
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Checks if retrying the same request may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Unavailable(_) | Self::Throttled { .. } => true,
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Checks if this is a credential problem.
    #[must_use]
    pub const fn is_authentication(&self) -> bool {
        matches!(self, Self::MissingCredential(_) | Self::Authentication(_))
    }

    /// Checks if the requested object does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns the server-requested retry delay, if any.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Throttled { retry_after } => *retry_after,
            _ => None,
        }
    }
}

/// Result type for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;
