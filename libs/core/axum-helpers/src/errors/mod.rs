pub mod codes;
pub mod handlers;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Body of every error response.
///
/// ```json
/// { "status": "validation errors", "error": "email required;nickname required" }
/// ```
///
/// `error` is omitted when there is nothing useful to add, as for
/// "resource not found".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Fixed status text for the failure class
    pub status: String,
    /// Free-text detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, error: Option<String>) -> Self {
        Self {
            status: code.status_text().to_string(),
            error,
        }
    }
}

/// Persistence operation a failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Select,
    Update,
    Delete,
}

impl Operation {
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Operation::Create => ErrorCode::CreateFailed,
            Operation::Select => ErrorCode::SelectFailed,
            Operation::Update => ErrorCode::UpdateFailed,
            Operation::Delete => ErrorCode::DeleteFailed,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Select => "select",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application error type that can be converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("validation errors: {0}")]
    Validation(String),

    #[error("resource not found")]
    NotFound,

    #[error("error during {operation}: {message}")]
    OperationFailed {
        operation: Operation,
        message: String,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn operation(operation: Operation, message: impl Into<String>) -> Self {
        AppError::OperationFailed {
            operation,
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::InvalidRequest(_) => ErrorCode::InvalidRequest,
            AppError::Validation(_) => ErrorCode::ValidationErrors,
            AppError::NotFound => ErrorCode::NotFound,
            AppError::OperationFailed { operation, .. } => operation.error_code(),
            AppError::Internal(_) => ErrorCode::Internal,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(validation_message(&errors))
    }
}

/// Flatten field errors into one line.
///
/// Fields are ordered by name and only the first message of each field is
/// kept; messages are joined with `;`.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .map(|(field, errs)| {
            errs.first()
                .and_then(|err| err.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| format!("{field} invalid"))
        })
        .collect::<Vec<_>>()
        .join(";")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();

        let error = match self {
            AppError::InvalidRequest(msg) => {
                tracing::info!(error_code = code.code(), "Invalid request: {}", msg);
                Some(msg)
            }
            AppError::Validation(msg) => {
                tracing::info!(error_code = code.code(), "Validation failed: {}", msg);
                Some(msg)
            }
            AppError::NotFound => {
                tracing::info!(error_code = code.code(), "Resource not found");
                None
            }
            AppError::OperationFailed { operation, message } => {
                tracing::error!(
                    error_code = code.code(),
                    operation = %operation,
                    "Operation failed: {}",
                    message
                );
                Some(message)
            }
            AppError::Internal(msg) => {
                tracing::error!(error_code = code.code(), "Internal error: {}", msg);
                None
            }
        };

        (code.http_status(), Json(ErrorResponse::new(code, error))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use http_body_util::BodyExt;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "zeta required"))]
        zeta: String,
        #[validate(length(min = 1, message = "alpha required"))]
        alpha: String,
        #[validate(length(min = 3, message = "beta too short"), email(message = "beta not email"))]
        beta: String,
    }

    async fn body_of(err: AppError) -> (StatusCode, ErrorResponse) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_validation_message_sorted_by_field() {
        let sample = Sample {
            zeta: String::new(),
            alpha: String::new(),
            beta: "ok-but-no-at".to_string(),
        };
        let errors = sample.validate().unwrap_err();

        assert_eq!(
            validation_message(&errors),
            "alpha required;beta not email;zeta required"
        );
    }

    #[tokio::test]
    async fn test_not_found_has_no_error_field() {
        let response = AppError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "resource not found" }));
    }

    #[tokio::test]
    async fn test_operation_failed_maps_to_bad_request() {
        let (status, body) = body_of(AppError::operation(Operation::Update, "duplicate key")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.status, "error during update");
        assert_eq!(body.error.as_deref(), Some("duplicate key"));
    }

    #[tokio::test]
    async fn test_internal_hides_detail() {
        let (status, body) = body_of(AppError::Internal("hasher panicked".into())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.status, "internal error");
        assert!(body.error.is_none());
    }
}
