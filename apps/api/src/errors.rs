use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::campaign::models::{describe_issues, FieldIssue};
use crate::campaign::normalizer::{NormalizeError, ValidationFailure};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    /// The body could not be read as JSON at all.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The body was JSON but one or more campaign fields were missing or malformed.
    #[error("Invalid request: {}", describe_issues(.0))]
    InvalidRequest(Vec<FieldIssue>),

    #[error("Failed to parse response as JSON: {0}")]
    MalformedOutput(String),

    #[error("Failed to validate response: {0}")]
    ValidationFailed(ValidationFailure),

    /// The completion service call itself failed (network, auth, quota).
    #[error("Completion service error: {0}")]
    CollaboratorUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<NormalizeError> for AppError {
    fn from(err: NormalizeError) -> Self {
        match err {
            NormalizeError::MalformedOutput(msg) => AppError::MalformedOutput(msg),
            NormalizeError::ValidationFailed(failure) => AppError::ValidationFailed(failure),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, code, details): (StatusCode, &str, Option<Value>) = match &self {
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", None),
            AppError::InvalidRequest(issues) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_REQUEST",
                Some(json!({ "fields": issues })),
            ),
            AppError::MalformedOutput(msg) => {
                tracing::error!("Malformed completion output: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "MALFORMED_OUTPUT", None)
            }
            AppError::ValidationFailed(failure) => {
                tracing::error!(
                    "Completion output failed validation: {failure} (top-level keys: {:?}, insights keys: {:?})",
                    failure.top_level_keys,
                    failure.insights_keys
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "VALIDATION_FAILED",
                    Some(json!({
                        "violations": failure.violations,
                        "top_level_keys": failure.top_level_keys,
                        "insights_keys": failure.insights_keys,
                    })),
                )
            }
            AppError::CollaboratorUnavailable(msg) => {
                tracing::error!("Completion service error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "COLLABORATOR_UNAVAILABLE",
                    None,
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                return error_body(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                );
            }
        };

        error_body(status, code, message, details)
    }
}

/// Converts a panic caught by `CatchPanicLayer` into the generic internal error.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    };
    AppError::Internal(anyhow::anyhow!("handler panicked: {detail}")).into_response()
}

fn error_body(status: StatusCode, code: &str, message: String, details: Option<Value>) -> Response {
    let mut error = json!({
        "code": code,
        "message": message,
    });
    if let Some(details) = details {
        error["details"] = details;
    }

    (status, Json(json!({ "error": error }))).into_response()
}
