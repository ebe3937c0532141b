//! Common error types and handling for Lingodesk

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Common result type
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Lingodesk application
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unknown project state: {0}")]
    UnknownState(String),

    #[error("Invalid transition: cannot move project from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Project {0} is already closed")]
    AlreadyClosed(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage failure: {0}")]
    StorageFailure(String),

    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Authentication(_) => StatusCode::UNAUTHORIZED,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::Validation(_) | Error::UnknownState(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidTransition { .. }
            | Error::InvalidState(_)
            | Error::AlreadyClosed(_)
            | Error::Conflict(_) => StatusCode::CONFLICT,
            Error::Unexpected(_)
            | Error::Database(_)
            | Error::Serialization(_)
            | Error::Io(_)
            | Error::StorageFailure(_)
            | Error::CorruptRecord(_)
            | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Unexpected(_) => "UNEXPECTED_ERROR",
            Error::Database(_) => "DATABASE_ERROR",
            Error::Serialization(_) => "SERIALIZATION_ERROR",
            Error::Io(_) => "IO_ERROR",
            Error::Authentication(_) => "AUTHENTICATION_ERROR",
            Error::Forbidden(_) => "FORBIDDEN",
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::NotFound(_) => "NOT_FOUND",
            Error::UnknownState(_) => "UNKNOWN_STATE",
            Error::InvalidTransition { .. } => "INVALID_TRANSITION",
            Error::InvalidState(_) => "INVALID_STATE",
            Error::AlreadyClosed(_) => "ALREADY_CLOSED",
            Error::Conflict(_) => "CONFLICT",
            Error::StorageFailure(_) => "STORAGE_FAILURE",
            Error::CorruptRecord(_) => "CORRUPT_RECORD",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        // Log internal errors with full context
        if matches!(status, StatusCode::INTERNAL_SERVER_ERROR) {
            tracing::error!(error = %self, "Internal server error");
        }

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
