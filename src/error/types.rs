//! Error type definitions
//!
//! Only construction-time and bootstrap failures are errors. Failures of the
//! main request are returned as values by the transport.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the request layer
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A mutating verb was given something other than an object body
    #[error("Invalid body for {verb}: expected an object, found {found}")]
    InvalidBody { verb: String, found: String },

    /// The session cookie bootstrap exchange failed
    #[error("Cookie derivation failed: {reason}")]
    CookieDerivation { reason: String },

    /// Proxy configuration errors
    #[error("Proxy error: {config}")]
    Proxy { config: String },

    /// An attachment could not be read into the outgoing body
    #[error("Attachment error for {}: {source}", path.display())]
    Attachment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Network/HTTP client errors
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid body error
    pub fn invalid_body(verb: impl Into<String>, found: impl Into<String>) -> Self {
        Self::InvalidBody {
            verb: verb.into(),
            found: found.into(),
        }
    }

    /// Create a cookie derivation error
    pub fn cookie(reason: impl Into<String>) -> Self {
        Self::CookieDerivation {
            reason: reason.into(),
        }
    }

    /// Create a proxy error
    pub fn proxy(config: impl Into<String>) -> Self {
        Self::Proxy {
            config: config.into(),
        }
    }

    /// Create an attachment error
    pub fn attachment(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Attachment {
            path: path.into(),
            source,
        }
    }

    /// Whether a later call may succeed without caller changes
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::CookieDerivation { .. } | Self::Network(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::config("test config error");
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(err.to_string(), "Configuration error: test config error");
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json");
        assert!(json_err.is_err());

        let err: Error = json_err.unwrap_err().into();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_invalid_body_error() {
        let err = Error::invalid_body("POST", "string");
        assert!(matches!(err, Error::InvalidBody { .. }));
        assert_eq!(
            err.to_string(),
            "Invalid body for POST: expected an object, found string"
        );
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_cookie_error_is_retryable() {
        let err = Error::cookie("no Set-Cookie headers");
        assert!(err.to_string().contains("Cookie derivation failed"));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_attachment_error_names_path() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = Error::attachment("/tmp/cat.png", io);
        assert!(err.to_string().contains("/tmp/cat.png"));
    }

    #[test]
    fn test_url_error() {
        let err: Error = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, Error::Url(_)));
    }

    #[test]
    fn test_proxy_error() {
        let err = Error::proxy("Invalid proxy config");
        assert!(matches!(err, Error::Proxy { .. }));
        assert!(err.to_string().contains("Proxy error"));
    }
}
