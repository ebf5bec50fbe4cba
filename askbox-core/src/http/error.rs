//! Transport errors of the job-system client.
//!
//! Status codes are kept as data so callers can branch on them without
//! parsing error strings.
//!
//! # Examples
//!
//! ```
//! use askbox_core::http::HttpError;
//!
//! let err = HttpError::http(404, "Task not found");
//! assert_eq!(err.status_code(), Some(404));
//! assert!(err.is_not_found());
//! ```

use reqwest::StatusCode;

/// Errors raised while talking to the job system
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// Non-success response with status code and message
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Network-level error (connection refused, DNS, TLS, ...)
    #[error("Network error: {0}")]
    Network(reqwest::Error),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Response body did not match the expected shape
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// The request was refused before it was sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            Self::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::ParseError(err.to_string())
        } else {
            Self::Network(err)
        }
    }
}

impl HttpError {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    pub fn from_status(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Http {
            status: status.as_u16(),
            message: message.into(),
        }
    }

    /// The HTTP status code, if the server answered at all
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// A 404 from the status endpoint means the job system forgot the task
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout) || matches!(self, Self::Network(e) if e.is_timeout())
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}
