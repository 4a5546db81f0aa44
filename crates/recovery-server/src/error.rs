//! Application error types and Axum response conversion.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use recovery_core::{ModelError, ValidationIssue};
use serde::Serialize;

/// Application-level errors with HTTP status code mapping.
#[derive(Debug)]
pub enum AppError {
    /// Request body is absent or not a usable JSON object.
    BadRequest(String),
    /// Payload failed schema validation; one message per feature.
    Validation(Vec<String>),
    /// Model or handler failure, reported with its raw message.
    Internal(String),
}

/// The `error` field is a single message or a list of validation messages.
#[derive(Serialize)]
#[serde(untagged)]
enum ErrorBody {
    Message(String),
    Issues(Vec<String>),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorBody::Message(msg)),
            AppError::Validation(issues) => (StatusCode::BAD_REQUEST, ErrorBody::Issues(issues)),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::Message(msg)),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<Vec<ValidationIssue>> for AppError {
    fn from(issues: Vec<ValidationIssue>) -> Self {
        AppError::Validation(issues.iter().map(ToString::to_string).collect())
    }
}
