//! Error types for the cache layer
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Backend Error Enum ==
/// Failures reported by a cache backend transport.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The backend could not be reached or dropped the connection
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The command did not complete in time; carries the limit when known
    #[error("Command timed out{}", .0.map(|ms| format!(" after {ms}ms")).unwrap_or_default())]
    Timeout(Option<u64>),

    /// The backend answered with something we could not use
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl From<redis::RedisError> for BackendError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_timeout() {
            BackendError::Timeout(None)
        } else if err.is_connection_dropped() || err.is_connection_refusal() || err.is_io_error() {
            BackendError::Connection(err.to_string())
        } else {
            BackendError::Protocol(err.to_string())
        }
    }
}

// == Cache Error Enum ==
/// Unified error type for the cache layer.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Requested record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A key parameter was absent; no key is derived from it
    #[error("Cache key parameter {index} is null")]
    NullKeyArgument { index: usize },

    /// Discriminator is not in the type registry
    #[error("Unknown type discriminator: {0}")]
    UnknownType(String),

    /// Discriminator lies outside the trusted packages
    #[error("Untrusted type discriminator: {0}")]
    UntrustedType(String),

    /// Payload holds a different registered type than the one requested
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Payload could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Backend failure that was not isolated by the error handler
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Serialization(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) | CacheError::NullKeyArgument { .. } => {
                StatusCode::BAD_REQUEST
            }
            CacheError::Backend(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::UnknownType(_)
            | CacheError::UntrustedType(_)
            | CacheError::TypeMismatch { .. }
            | CacheError::Serialization(_)
            | CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache layer.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let response = CacheError::NotFound("approve group user 7".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_null_key_argument_maps_to_400() {
        let response = CacheError::NullKeyArgument { index: 1 }.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_backend_error_maps_to_503() {
        let err: CacheError = BackendError::Connection("refused".to_string()).into();
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_redis_io_error_is_connection() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = BackendError::from(redis::RedisError::from(io));
        assert!(matches!(err, BackendError::Connection(_)));
    }

    #[test]
    fn test_redis_timeout_has_no_known_limit() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        let err = BackendError::from(redis::RedisError::from(io));
        assert_eq!(err, BackendError::Timeout(None));
        assert_eq!(err.to_string(), "Command timed out");
    }

    #[test]
    fn test_redis_response_error_is_protocol() {
        let err = BackendError::from(redis::RedisError::from((
            redis::ErrorKind::ResponseError,
            "WRONGTYPE",
        )));
        assert!(matches!(err, BackendError::Protocol(_)));
    }

    #[test]
    fn test_elapsed_timeout_names_limit() {
        assert_eq!(
            BackendError::Timeout(Some(500)).to_string(),
            "Command timed out after 500ms"
        );
    }

    #[test]
    fn test_serde_error_converts_to_serialization() {
        let err: CacheError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, CacheError::Serialization(_)));
    }
}
