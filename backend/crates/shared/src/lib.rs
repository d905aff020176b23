//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of domain vocabulary:
//! - Common error types, the error envelope and result aliases
//! - Typed ids
//! - The success envelope
//! - Input sanitizing and validation glue shared by every route
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all domains.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
#[cfg(feature = "sqlx")]
pub mod db;
#[cfg(feature = "axum")]
pub mod extract;
pub mod id;
pub mod response;
pub mod sanitize;
pub mod validation;

pub use error::app_error::{AppError, AppResult, FieldError};
pub use error::kind::ErrorKind;
pub use response::ApiResponse;
