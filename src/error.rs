use std::error::Error;
use std::fmt;

use warp::http::StatusCode;

#[derive(Debug, Clone)]
pub enum ApiError {
    // Boundary errors
    Validation(String),
    Unauthenticated(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),

    // Internal errors
    StorageError(String),
    ConfigError(String),
}

impl ApiError {
    /// The message sent back to the client. Internal errors are masked so
    /// storage or configuration detail never leaks over the wire.
    pub fn client_message(&self) -> &str {
        match self {
            Self::Validation(msg)
            | Self::Unauthenticated(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg)
            | Self::Conflict(msg) => msg,
            Self::StorageError(_) | Self::ConfigError(_) => "Internal server error",
        }
    }

    /// HTTP status code conveying the error kind
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::StorageError(_) | Self::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "Validation error: {}", msg),
            Self::Unauthenticated(msg) => write!(f, "Authentication error: {}", msg),
            Self::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            Self::NotFound(msg) => write!(f, "Not found: {}", msg),
            Self::Conflict(msg) => write!(f, "Conflict: {}", msg),
            Self::StorageError(msg) => write!(f, "Storage error: {}", msg),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl Error for ApiError {}

impl warp::reject::Reject for ApiError {}

/// Wrap an ApiError into a warp rejection
pub fn reject(err: ApiError) -> warp::Rejection {
    warp::reject::custom(err)
}

// Generic result type for Fundlink
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_errors_are_masked() {
        let err = ApiError::StorageError("lock poisoned".to_string());
        assert_eq!(err.client_message(), "Internal server error");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn boundary_errors_carry_their_message() {
        let err = ApiError::Forbidden("Cannot update admin status".to_string());
        assert_eq!(err.client_message(), "Cannot update admin status");
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }
}
