//! Error types for the RagLens core library.
//!
//! Uses `thiserror` for public API error types with structured variants
//! covering the backend API, configuration, and IO domains.
//!
//! The grounding engine itself (`crate::grounding`) is a layer of total
//! functions and never produces errors: malformed-but-well-typed input
//! (empty answers, missing entity lists) degrades to empty results.

use std::path::PathBuf;

/// Top-level error type for the RagLens core library.
#[derive(Debug, thiserror::Error)]
pub enum RagLensError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from backend HTTP interactions.
///
/// All of these are transient from the application's point of view: a failed
/// request never invalidates a previously received query result.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {message}")]
    RequestFailed { message: String },

    #[error("backend returned {status}: {detail}")]
    Backend { status: u16, detail: String },

    #[error("resource not found: {resource}")]
    NotFound { resource: String },

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("upload did not complete within {timeout_secs}s")]
    PollTimeout { timeout_secs: u64 },

    #[error("document processing failed: {detail}")]
    Processing { detail: String },

    #[error("response parse error: {message}")]
    ResponseParse { message: String },

    #[error("connection to backend failed: {message}")]
    Connection { message: String },
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("invalid configuration: {message}")]
    Invalid { message: String },

    #[error("invalid backend URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("configuration parse error: {message}")]
    ParseError { message: String },
}

/// A type alias for results using the top-level `RagLensError`.
pub type Result<T> = std::result::Result<T, RagLensError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_api() {
        let err = RagLensError::Api(ApiError::RequestFailed {
            message: "connection refused".into(),
        });
        assert_eq!(err.to_string(), "API error: request failed: connection refused");
    }

    #[test]
    fn test_error_display_backend_status() {
        let err = RagLensError::Api(ApiError::Backend {
            status: 500,
            detail: "index not loaded".into(),
        });
        assert_eq!(err.to_string(), "API error: backend returned 500: index not loaded");
    }

    #[test]
    fn test_error_display_poll_timeout() {
        let err = ApiError::PollTimeout { timeout_secs: 300 };
        assert_eq!(err.to_string(), "upload did not complete within 300s");
    }

    #[test]
    fn test_error_display_config() {
        let err = RagLensError::Config(ConfigError::InvalidUrl {
            url: "not a url".into(),
            message: "relative URL without a base".into(),
        });
        assert_eq!(
            err.to_string(),
            "Configuration error: invalid backend URL 'not a url': relative URL without a base"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RagLensError = io_err.into();
        assert!(matches!(err, RagLensError::Io(_)));
    }

    #[test]
    fn test_error_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: RagLensError = serde_err.into();
        assert!(matches!(err, RagLensError::Serialization(_)));
    }
}
