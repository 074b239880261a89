//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::models::visit::VisitStatus;

/// Application-wide error type.
///
/// Each variant maps to a specific HTTP status code and error code string.
///
/// # Error Categories
///
/// - **Internal**: database, password hashing and token signing failures
/// - **Authentication**: missing, malformed or expired bearer tokens and bad credentials
/// - **Authorization**: caller is authenticated but may not perform the action
/// - **Resource**: requested row does not exist or is not visible to the caller
/// - **Business rules**: conflicts and status workflow violations
/// - **Validation**: invalid request data
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed.
    ///
    /// Unique-constraint violations are converted to `Conflict` by
    /// [`AppError::from_db`] before reaching this variant.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Password hashing or verification backend failed.
    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    /// Token could not be signed.
    #[error("Token error: {0}")]
    Token(String),

    /// Missing or invalid credentials.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Unauthorized")]
    Unauthorized,

    /// Caller may not perform this action.
    ///
    /// Returns HTTP 403 Forbidden.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource does not exist or is not visible to the caller.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Request conflicts with current state (duplicates, overlapping bookings).
    ///
    /// Returns HTTP 409 Conflict.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Requested visit status change is not in the workflow.
    ///
    /// Returns HTTP 409 Conflict.
    #[error("Cannot change visit status from {from} to {to}")]
    InvalidStatusTransition { from: VisitStatus, to: VisitStatus },

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl AppError {
    /// Map a sqlx error, turning unique-constraint violations into `Conflict`.
    pub fn from_db(err: sqlx::Error, conflict_message: &str) -> Self {
        if crate::db::is_unique_violation(&err) {
            AppError::Conflict(conflict_message.to_string())
        } else {
            AppError::Database(err)
        }
    }

    /// HTTP status and machine-readable code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            AppError::InvalidStatusTransition { .. } => {
                (StatusCode::CONFLICT, "invalid_status_transition")
            }
            AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            AppError::Database(_) | AppError::PasswordHash(_) | AppError::Token(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// Internal errors are logged and replaced by a generic message.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
