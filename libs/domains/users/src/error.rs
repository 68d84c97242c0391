use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, Operation};
use thiserror::Error;

use crate::repository::StoreError;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("user not found")]
    NotFound,

    #[error("error during {operation}: {source}")]
    Store {
        operation: Operation,
        #[source]
        source: StoreError,
    },

    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl UserError {
    /// Tag a gateway failure with the operation it happened in.
    ///
    /// A gateway `NotFound` stays `NotFound` so callers see 404 rather than a
    /// generic operation failure.
    pub fn store(operation: Operation) -> impl FnOnce(StoreError) -> UserError {
        move |source| match source {
            StoreError::NotFound => UserError::NotFound,
            source => UserError::Store { operation, source },
        }
    }
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound => AppError::NotFound,
            UserError::Store { operation, source } => {
                AppError::operation(operation, source.to_string())
            }
            UserError::PasswordHash(msg) => AppError::Internal(msg),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
