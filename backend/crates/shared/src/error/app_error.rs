//! Application Error - Unified error type for the application
//!
//! Defines [`AppError`] struct, [`FieldError`] and [`AppResult<T>`] type alias.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use serde::Serialize;

use super::kind::ErrorKind;

/// One failed rule on one input field.
///
/// Serialized as `{"field": "...", "message": "..."}` inside the `details`
/// array of the error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Cow<'static, str>,
    pub message: Cow<'static, str>,
}

impl FieldError {
    pub fn new(
        field: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Unified application error.
///
/// Every crate-specific error converts into this type before it reaches the
/// wire. Built with a small builder API.
///
/// ## Fields
/// * `kind` - classification, maps to the HTTP status
/// * `message` - client-facing message
/// * `details` - field-level failures (validation, duplicate key)
/// * `source` - underlying error, exposed as `stack` outside production
///
/// ## Examples
/// ```rust
/// use kernel::error::{app_error::{AppError, FieldError}, kind::ErrorKind};
///
/// let err = AppError::new(ErrorKind::NotFound, "Post not found");
///
/// let err = AppError::bad_request("Validation failed")
///     .with_details(vec![FieldError::new("title", "Title must be 5-120 characters")]);
/// assert_eq!(err.details().len(), 1);
/// ```
pub struct AppError {
    kind: ErrorKind,
    message: Cow<'static, str>,
    details: Vec<FieldError>,
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

/// `Result<T, AppError>`
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    // ========================================================================
    // Constructors
    // ========================================================================

    #[inline]
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: Vec::new(),
            source: None,
        }
    }

    #[inline]
    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    #[inline]
    pub fn unauthorized(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    #[inline]
    pub fn forbidden(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    #[inline]
    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    #[inline]
    pub fn payload_too_large(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::PayloadTooLarge, message)
    }

    #[inline]
    pub fn too_many_requests(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::TooManyRequests, message)
    }

    #[inline]
    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InternalServerError, message)
    }

    #[inline]
    pub fn service_unavailable(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }

    /// 400 "Validation failed" carrying every failed rule.
    pub fn validation(details: Vec<FieldError>) -> Self {
        Self::bad_request("Validation failed").with_details(details)
    }

    /// 400 for a unique constraint hit on `field`.
    pub fn duplicate_key(field: impl Into<Cow<'static, str>>) -> Self {
        let field = field.into();
        let message = format!("{field} already exists. Please use another value.");
        Self::bad_request(message.clone()).with_details(vec![FieldError::new(field, message)])
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    #[inline]
    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = details;
        self
    }

    /// Attach the underlying error.
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::app_error::{AppError, AppResult};
    ///
    /// fn read_config() -> AppResult<()> {
    ///     std::fs::read_to_string("config.json")
    ///         .map_err(|e| AppError::internal("Failed to read config").with_source(e))?;
    ///     Ok(())
    /// }
    /// ```
    #[inline]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn details(&self) -> &[FieldError] {
        &self.details
    }

    #[inline]
    pub fn is_server_error(&self) -> bool {
        self.kind.is_server_error()
    }

    /// Renders the source chain, outermost first, one error per line.
    pub fn source_chain(&self) -> Option<String> {
        let first = self.source.as_deref()?;
        let mut lines = vec![first.to_string()];
        let mut current = first.source();
        while let Some(err) = current {
            lines.push(format!("caused by: {err}"));
            current = err.source();
        }
        Some(lines.join("\n"))
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("AppError");
        builder.field("kind", &self.kind);
        builder.field("message", &self.message);
        if !self.details.is_empty() {
            builder.field("details", &self.details);
        }
        if let Some(source) = &self.source {
            builder.field("source", source);
        }
        builder.finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}
