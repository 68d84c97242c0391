//! Error codes shared by every JSON error response.
//!
//! Each code carries the status text clients see in the `status` field and
//! the HTTP status it is returned with.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//! use axum::http::StatusCode;
//!
//! assert_eq!(ErrorCode::ValidationErrors.status_text(), "validation errors");
//! assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
//! ```

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Body could not be decoded or a path parameter is malformed
    InvalidRequest,
    /// Body decoded but violates field rules
    ValidationErrors,
    /// Identifier has no backing record
    NotFound,
    CreateFailed,
    SelectFailed,
    UpdateFailed,
    DeleteFailed,
    /// Unexpected server-side failure
    Internal,
}

impl ErrorCode {
    /// Text placed in the `status` field of the response body
    pub const fn status_text(&self) -> &'static str {
        match self {
            ErrorCode::InvalidRequest => "invalid request",
            ErrorCode::ValidationErrors => "validation errors",
            ErrorCode::NotFound => "resource not found",
            ErrorCode::CreateFailed => "error during create",
            ErrorCode::SelectFailed => "error during select",
            ErrorCode::UpdateFailed => "error during update",
            ErrorCode::DeleteFailed => "error during delete",
            ErrorCode::Internal => "internal error",
        }
    }

    pub const fn http_status(&self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Integer code for log correlation
    pub const fn code(&self) -> i32 {
        match self {
            ErrorCode::InvalidRequest => 1001,
            ErrorCode::ValidationErrors => 1002,
            ErrorCode::NotFound => 1004,
            ErrorCode::CreateFailed => 2001,
            ErrorCode::SelectFailed => 2002,
            ErrorCode::UpdateFailed => 2003,
            ErrorCode::DeleteFailed => 2004,
            ErrorCode::Internal => 5000,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.status_text())
    }
}
