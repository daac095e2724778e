//! Error types and handling for the reader client.
//!
//! Only the API client layer can fail. The markup rewriter and avatar
//! resolver are total functions and never produce a [`ReaderError`].
//!
//! ## Error Categories
//!
//! - **Network Errors**: connection failures, timeouts (retryable)
//! - **Status Errors**: non-2xx responses, body carried verbatim (5xx retryable)
//! - **API Errors**: the backend envelope reported a non-zero `code`
//! - **Parsing Errors**: JSON or URL parsing failures (not retryable)
//! - **Configuration Errors**: invalid settings (not retryable)
//!
//! The crate never retries on its own; [`ReaderError::is_retryable`] is a hint
//! for callers that want to.
//!
//! ## Usage
//!
//! ```rust
//! use wechat_reader_rs::ReaderError;
//! use wechat_reader_rs::error::ErrorSeverity;
//!
//! fn handle_error(error: ReaderError) {
//!     match error.severity() {
//!         ErrorSeverity::Warning => {
//!             tracing::warn!("Recoverable error: {}", error);
//!         }
//!         ErrorSeverity::Error | ErrorSeverity::Critical => {
//!             tracing::error!("Request failed: {}", error);
//!         }
//!     }
//! }
//! ```

use std::fmt;

/// Result type alias for reader client operations.
pub type Result<T> = std::result::Result<T, ReaderError>;

/// Error type for reader client operations.
#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    /// Transport-level failure (retryable)
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Backend answered with a non-success HTTP status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Backend envelope carried a non-zero code
    #[error("API error [{code}]: {message}")]
    Api { code: i64, message: String },

    /// Configuration errors (not retryable)
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("JSON processing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ReaderError {
    /// Determines if an error is worth retrying by the caller.
    ///
    /// Network failures, timeouts and server-side (5xx) statuses are
    /// retryable. Envelope errors in the 5xxxx range signal backend faults and
    /// are retryable too; everything else is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ReaderError::Network(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            ReaderError::Status { status, .. } => *status >= 500 || *status == 429,
            ReaderError::Api { code, .. } => (50000..60000).contains(code),
            _ => false,
        }
    }

    /// Gets the severity level of the error for logging purposes.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ReaderError::Network(_) => ErrorSeverity::Warning,
            ReaderError::Status { status, .. } => match status {
                401 | 403 => ErrorSeverity::Critical,
                s if *s >= 500 => ErrorSeverity::Warning,
                _ => ErrorSeverity::Error,
            },
            ReaderError::Api { .. } => ErrorSeverity::Error,
            ReaderError::Config { .. } => ErrorSeverity::Critical,
            ReaderError::Json(_) | ReaderError::UrlParse(_) | ReaderError::Internal(_) => {
                ErrorSeverity::Error
            }
        }
    }

    /// Creates an API error from envelope data.
    pub fn from_api_response(code: i64, message: impl Into<String>) -> Self {
        ReaderError::Api {
            code,
            message: message.into(),
        }
    }

    /// Creates a status error from a non-success response.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        ReaderError::Status {
            status,
            body: body.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config_error(message: impl Into<String>) -> Self {
        ReaderError::Config {
            message: message.into(),
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ReaderError::Status { status, .. } => Some(*status),
            ReaderError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Error severity levels for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Transient failures the caller may retry
    Warning,
    /// Standard errors that affect a single operation
    Error,
    /// Errors that will keep failing until configuration or credentials change
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "WARNING"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
