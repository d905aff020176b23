//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::db::{DbFailure, classify};
use kernel::error::{
    app_error::{AppError, FieldError},
    kind::ErrorKind,
};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// One or more input fields broke a rule
    #[error("Validation failed")]
    ValidationFailed(Vec<FieldError>),

    /// Unique index hit on write (lost a race with a concurrent request)
    #[error("{field} already exists. Please use another value.")]
    DuplicateKey { field: String },

    /// Unknown login or wrong password; deliberately indistinguishable
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Current password is incorrect")]
    WrongCurrentPassword,

    /// Profile update to a username another account holds
    #[error("Username already taken")]
    UsernameTaken,

    #[error("Email already registered")]
    EmailTaken,

    /// No bearer token on a protected route
    #[error("You are not logged in. Please log in to get access.")]
    NotLoggedIn,

    /// Bad signature, bad format, unknown algorithm
    #[error("Invalid token. Please log in again.")]
    InvalidToken,

    #[error("Your token has expired. Please log in again.")]
    ExpiredToken,

    /// Token verified but the user was deleted since it was issued
    #[error("The user belonging to this token no longer exists.")]
    UserGone,

    #[error("User not found")]
    UserNotFound,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Single-field validation failure.
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        AuthError::ValidationFailed(vec![FieldError::new(field, message.into())])
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::ValidationFailed(_)
            | AuthError::DuplicateKey { .. }
            | AuthError::WrongCurrentPassword
            | AuthError::UsernameTaken
            | AuthError::EmailTaken => ErrorKind::BadRequest,
            AuthError::InvalidCredentials
            | AuthError::NotLoggedIn
            | AuthError::InvalidToken
            | AuthError::ExpiredToken
            | AuthError::UserGone => ErrorKind::Unauthorized,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::Database(e) => match classify(e) {
                DbFailure::UniqueViolation { .. } => ErrorKind::BadRequest,
                DbFailure::Unavailable => ErrorKind::ServiceUnavailable,
                DbFailure::NotFound => ErrorKind::NotFound,
                DbFailure::Other => ErrorKind::InternalServerError,
            },
            AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// True for the four failures the gate can raise.
    pub fn is_token_failure(&self) -> bool {
        matches!(
            self,
            AuthError::NotLoggedIn
                | AuthError::InvalidToken
                | AuthError::ExpiredToken
                | AuthError::UserGone
        )
    }

    /// Convert to AppError
    pub fn into_app_error(self) -> AppError {
        match self {
            AuthError::ValidationFailed(details) => AppError::validation(details),
            AuthError::DuplicateKey { field } => AppError::duplicate_key(field),
            AuthError::Database(e) => AppError::from(e),
            AuthError::Internal(msg) => {
                AppError::internal("Something went wrong").with_source(InternalMessage(msg))
            }
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::WrongCurrentPassword => {
                tracing::warn!("Password change with wrong current password");
            }
            e if e.is_token_failure() => {
                tracing::warn!(error = %e, "Rejected bearer token");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        if err.kind() == ErrorKind::BadRequest && !err.details().is_empty() {
            return AuthError::ValidationFailed(err.details().to_vec());
        }
        AuthError::Internal(err.to_string())
    }
}

#[derive(Debug, Error)]
#[error("{0}")]
struct InternalMessage(String);
