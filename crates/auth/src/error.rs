//! Authentication errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Authentication error
#[derive(Debug)]
pub enum AuthError {
    MissingAuthorization,
    InvalidAuthorizationFormat,
    InvalidToken,
    InvalidUserId,
    UserNotFound,
    UserLoadError,
    TokenIssueFailed,
    /// Caller's role is not allowed on this route
    InsufficientRole,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthError::MissingAuthorization => (
                StatusCode::UNAUTHORIZED,
                "MISSING_AUTHORIZATION",
                "Authorization header required",
            ),
            AuthError::InvalidAuthorizationFormat => (
                StatusCode::UNAUTHORIZED,
                "INVALID_AUTHORIZATION",
                "Invalid authorization header format",
            ),
            AuthError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Invalid or expired token",
            ),
            AuthError::InvalidUserId => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Invalid user ID in token",
            ),
            AuthError::UserNotFound => {
                (StatusCode::UNAUTHORIZED, "USER_NOT_FOUND", "User not found")
            }
            AuthError::UserLoadError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "USER_LOAD_ERROR",
                "Failed to load user",
            ),
            AuthError::TokenIssueFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AUTH_ERROR",
                "Failed to issue access token",
            ),
            AuthError::InsufficientRole => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Only administrators can access this operation",
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_status_codes() {
        let cases: Vec<(AuthError, StatusCode)> = vec![
            (AuthError::MissingAuthorization, StatusCode::UNAUTHORIZED),
            (
                AuthError::InvalidAuthorizationFormat,
                StatusCode::UNAUTHORIZED,
            ),
            (AuthError::InvalidToken, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidUserId, StatusCode::UNAUTHORIZED),
            (AuthError::UserNotFound, StatusCode::UNAUTHORIZED),
            (AuthError::UserLoadError, StatusCode::INTERNAL_SERVER_ERROR),
            (
                AuthError::TokenIssueFailed,
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (AuthError::InsufficientRole, StatusCode::FORBIDDEN),
        ];

        for (error, expected_status) in cases {
            let response = error.into_response();
            assert_eq!(response.status(), expected_status);
        }
    }
}
