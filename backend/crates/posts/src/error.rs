//! Post Error Types
//!
//! Post-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::db::{DbFailure, classify};
use kernel::error::{
    app_error::{AppError, FieldError},
    kind::ErrorKind,
};
use thiserror::Error;

pub type PostResult<T> = Result<T, PostError>;

#[derive(Debug, Error)]
pub enum PostError {
    #[error("Validation failed")]
    ValidationFailed(Vec<FieldError>),

    /// Not shaped like a post id
    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Post not found")]
    NotFound,

    /// Requester is not the author. `action` is "update" or "delete".
    #[error("You are not authorized to {action} this post")]
    Forbidden { action: &'static str },

    /// Unique index hit on write, e.g. two creates racing for one slug
    #[error("{field} already exists. Please use another value.")]
    DuplicateKey { field: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PostError {
    pub fn invalid(field: &'static str, message: &'static str) -> Self {
        PostError::ValidationFailed(vec![FieldError::new(field, message)])
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PostError::ValidationFailed(_)
            | PostError::InvalidId(_)
            | PostError::DuplicateKey { .. } => ErrorKind::BadRequest,
            PostError::NotFound => ErrorKind::NotFound,
            PostError::Forbidden { .. } => ErrorKind::Forbidden,
            PostError::Database(e) => match classify(e) {
                DbFailure::UniqueViolation { .. } => ErrorKind::BadRequest,
                DbFailure::Unavailable => ErrorKind::ServiceUnavailable,
                DbFailure::NotFound => ErrorKind::NotFound,
                DbFailure::Other => ErrorKind::InternalServerError,
            },
            PostError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn into_app_error(self) -> AppError {
        match self {
            PostError::ValidationFailed(details) => AppError::validation(details),
            PostError::DuplicateKey { field } => AppError::duplicate_key(field),
            PostError::Database(e) => AppError::from(e),
            PostError::Internal(msg) => {
                AppError::internal("Something went wrong").with_source(InternalMessage(msg))
            }
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    fn log(&self) {
        match self {
            PostError::Database(e) => tracing::error!(error = %e, "Post database error"),
            PostError::Internal(msg) => tracing::error!(message = %msg, "Post internal error"),
            PostError::Forbidden { action } => {
                tracing::warn!(action = %action, "Non-author tried to modify a post")
            }
            _ => tracing::debug!(error = %self, "Post error"),
        }
    }
}

impl IntoResponse for PostError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}

#[derive(Debug, Error)]
#[error("{0}")]
struct InternalMessage(String);
