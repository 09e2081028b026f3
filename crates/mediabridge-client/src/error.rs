//! Error types for API and query operations.

use std::sync::Arc;

use thiserror::Error;

/// Result alias for raw API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Result alias for cached reads.
pub type QueryResult<T> = Result<T, QueryError>;

/// Failure while talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client")]
    ClientBuild {
        /// Underlying reqwest error.
        source: reqwest::Error,
    },
    /// A path could not be joined onto the base URL.
    #[error("invalid request path '{path}'")]
    InvalidPath {
        /// Relative path that failed to join.
        path: String,
        /// Underlying URL parse error.
        source: url::ParseError,
    },
    /// Network or transport failure before a response arrived.
    #[error("request to {path} failed")]
    Transport {
        /// Relative request path.
        path: String,
        /// Underlying reqwest error.
        source: reqwest::Error,
    },
    /// The backend answered with a non-2xx status.
    #[error("{path} returned HTTP {status}{}", message_suffix(.message.as_deref()))]
    Status {
        /// Relative request path.
        path: String,
        /// HTTP status code.
        status: u16,
        /// Envelope message, when the body carried one.
        message: Option<String>,
    },
    /// The response body was not a valid envelope for the expected type.
    #[error("failed to decode response from {path}")]
    Decode {
        /// Relative request path.
        path: String,
        /// Underlying serde error.
        source: serde_json::Error,
    },
}

fn message_suffix(message: Option<&str>) -> String {
    message
        .filter(|text| !text.is_empty())
        .map(|text| format!(": {text}"))
        .unwrap_or_default()
}

impl ApiError {
    /// HTTP status for [`ApiError::Status`] failures.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Error surfaced by cached reads.
///
/// Every caller joined on the same in-flight request receives a clone of the
/// same failure, so the source is reference counted.
#[derive(Debug, Clone, Error)]
#[error(transparent)]
pub struct QueryError(Arc<ApiError>);

impl QueryError {
    /// Underlying API failure.
    #[must_use]
    pub fn api(&self) -> &ApiError {
        &self.0
    }
}

impl From<ApiError> for QueryError {
    fn from(value: ApiError) -> Self {
        Self(Arc::new(value))
    }
}
