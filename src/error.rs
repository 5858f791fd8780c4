// SPDX-License-Identifier: MIT

//! Application error types with consistent API responses.
//!
//! Every response, success or failure, carries the same envelope:
//! `{status: "success"|"fail"|"error", data|message}`. Client-caused
//! failures are `fail`; unexpected server-side failures are `error`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Envelope status markers.
pub mod status {
    pub const SUCCESS: &str = "success";
    pub const FAIL: &str = "fail";
    pub const ERROR: &str = "error";
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// No authorization header on a protected route.
    #[error("Token is required")]
    MissingToken,

    /// Malformed, expired, or badly signed token. All verification
    /// failures collapse here; no distinction reaches the caller.
    #[error("Unauthorized")]
    InvalidToken,

    /// Login failure. Deliberately identical for unknown email and
    /// wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// One or more field rules violated; carries the complete list.
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    BadRequest(String),

    /// Duplicate email on register, duplicate per-owner title on create.
    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    NotFound(String),

    /// Requested page past the end of a non-empty result set.
    #[error("Page not found")]
    PageNotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON failure body.
#[derive(Serialize)]
struct ErrorBody {
    status: &'static str,
    message: serde_json::Value,
}

/// JSON success body.
#[derive(Serialize)]
pub struct Envelope<T: Serialize> {
    pub status: &'static str,
    pub data: T,
}

/// Wrap handler data in the success envelope.
pub fn success<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        status: status::SUCCESS,
        data,
    })
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, status) = match &self {
            AppError::MissingToken | AppError::InvalidToken | AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, status::FAIL)
            }
            AppError::Validation(_) | AppError::BadRequest(_) | AppError::Duplicate(_) => {
                (StatusCode::BAD_REQUEST, status::FAIL)
            }
            AppError::NotFound(_) | AppError::PageNotFound => (StatusCode::NOT_FOUND, status::FAIL),
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, status::ERROR)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, status::ERROR)
            }
        };

        let message = match &self {
            AppError::Validation(errors) => {
                serde_json::to_value(errors).unwrap_or_else(|_| self.to_string().into())
            }
            other => other.to_string().into(),
        };

        let body = ErrorBody { status, message };

        (code, Json(body)).into_response()
    }
}

/// Result type alias for handlers.
pub type Result<T> = std::result::Result<T, AppError>;
