/**
 * Backend Error Types
 *
 * This module defines the service error taxonomy. Each variant carries
 * enough context to produce an HTTP response:
 *
 * - `NotFound` - room or user absent; caller shows an empty state, no retry
 * - `Unauthorized` / `Forbidden` - ownership or role check failed; surfaced
 *   to the user, never retried automatically
 * - `InvalidRole` - a role outside {edit, view} was supplied
 * - `TransientIo` - a network or store call failed; recoverable, the next
 *   debounce cycle retries persistence implicitly
 * - `Sandbox` - the execution sandbox could not be reached (a
 *   sandbox-reported compile error is program output, not this error)
 */
use axum::http::StatusCode;
use thiserror::Error;

use crate::shared::SharedError;

/// Service error taxonomy with HTTP mappings
#[derive(Debug, Error)]
pub enum ApiError {
    /// A referenced room or user does not exist
    #[error("{resource} not found")]
    NotFound {
        /// What was being looked up (e.g. "room", "user")
        resource: String,
    },

    /// The acting identity does not own the resource
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Human-readable error message
        message: String,
    },

    /// The acting identity's role does not permit the operation
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Human-readable error message
        message: String,
    },

    /// A role outside {edit, view} was supplied
    #[error("invalid role: {value}")]
    InvalidRole {
        /// The rejected role string
        value: String,
    },

    /// A store or network call failed; recoverable
    #[error("Transient I/O error: {message}")]
    TransientIo {
        /// Human-readable error message
        message: String,
    },

    /// The execution sandbox was unreachable or returned garbage
    #[error("Sandbox error: {message}")]
    Sandbox {
        /// Human-readable error message
        message: String,
    },

    /// Shared validation/serialization error
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    /// Create a not-found error for a named resource
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create an unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create a forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Create an invalid-role error
    pub fn invalid_role(value: impl Into<String>) -> Self {
        Self::InvalidRole {
            value: value.into(),
        }
    }

    /// Create a transient I/O error
    pub fn transient(message: impl Into<String>) -> Self {
        Self::TransientIo {
            message: message.into(),
        }
    }

    /// Create a sandbox transport error
    pub fn sandbox(message: impl Into<String>) -> Self {
        Self::Sandbox {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `NotFound` - 404
    /// - `Unauthorized` - 401
    /// - `Forbidden` - 403
    /// - `InvalidRole` - 400
    /// - `TransientIo` - 503
    /// - `Sandbox` - 502
    /// - `SharedError` - 400 for validation, 500 for serialization
    /// - `Database` / `Serialization` - 500
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::InvalidRole { .. } => StatusCode::BAD_REQUEST,
            Self::TransientIo { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Sandbox { .. } => StatusCode::BAD_GATEWAY,
            Self::SharedError(err) => match err {
                SharedError::ValidationError { .. } => StatusCode::BAD_REQUEST,
                SharedError::SerializationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found() {
        let error = ApiError::not_found("room");
        match &error {
            ApiError::NotFound { resource } => assert_eq!(resource, "room"),
            _ => panic!("Expected NotFound"),
        }
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(error.message(), "room not found");
    }

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            ApiError::unauthorized("not the admin").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::forbidden("view role cannot publish").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::invalid_role("owner").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::transient("store offline").status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::sandbox("connection refused").status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_invalid_role_message_names_value() {
        let error = ApiError::invalid_role("owner");
        assert!(error.message().contains("owner"));
    }

    #[test]
    fn test_from_shared_error() {
        let shared = SharedError::validation("roomName", "must not be empty");
        let error: ApiError = shared.into();
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }
}
