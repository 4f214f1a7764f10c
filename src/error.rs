/*
 * Responsibility
 * - アプリ共通の AppError 定義 (authorization failure taxonomy)
 * - IntoResponse 実装 (HTTP status / JSON error body)
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Every authorization failure is terminal for the current request: each
/// variant maps to exactly one status + message pair, and the `#[error]`
/// message is the wire message.
#[derive(Debug, Error)]
pub enum AppError {
    /// No `Authorization` header, or one that is not `Bearer <token>`.
    #[error("Missing bearer token")]
    MissingToken,

    /// The authority reported the token as inactive (or unknown). Which of
    /// the two it was is deliberately not surfaced to the caller.
    #[error("Access denied")]
    AccessDenied,

    #[error("User {username} does not have sufficient privileges")]
    InsufficientPrivileges { username: String },

    /// Transport-level failure (or timeout) talking to the introspection
    /// authority.
    #[error("Cannot reach authorization server")]
    AuthorityUnreachable,

    /// The authority answered outside the 2xx range, or with a payload we
    /// could not interpret.
    #[error("Unexpected authorization error")]
    AuthorityError,

    #[error("internal server error")]
    Internal,
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::MissingToken | AppError::AccessDenied => StatusCode::UNAUTHORIZED,
            AppError::InsufficientPrivileges { .. } => StatusCode::FORBIDDEN,
            AppError::AuthorityUnreachable => StatusCode::BAD_GATEWAY,
            AppError::AuthorityError | AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = ErrorBody {
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
