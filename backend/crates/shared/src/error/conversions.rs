//! Error conversions - From implementations and the HTTP rendering of [`AppError`]

use std::sync::atomic::{AtomicBool, Ordering};

use super::app_error::AppError;

static EXPOSE_STACK: AtomicBool = AtomicBool::new(false);

/// Toggle whether error responses carry the `stack` field.
///
/// Set once at startup from the environment; never enabled in production.
pub fn set_expose_stack(expose: bool) {
    EXPOSE_STACK.store(expose, Ordering::Relaxed);
}

pub fn expose_stack() -> bool {
    EXPOSE_STACK.load(Ordering::Relaxed)
}

// ============================================================================
// serde_json conversions
// ============================================================================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() || err.is_eof() {
            AppError::bad_request(format!("Invalid request body: {err}")).with_source(err)
        } else {
            AppError::internal("JSON serialization error").with_source(err)
        }
    }
}

// ============================================================================
// SQLx conversions (feature-gated)
// ============================================================================

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        use crate::db::{DbFailure, classify};

        match classify(&err) {
            DbFailure::UniqueViolation { field } => AppError::duplicate_key(field).with_source(err),
            DbFailure::Unavailable => {
                AppError::service_unavailable("Database unavailable").with_source(err)
            }
            DbFailure::NotFound => AppError::not_found("Record not found").with_source(err),
            DbFailure::Other => AppError::internal("Database error").with_source(err),
        }
    }
}

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl AppError {
    /// Envelope body: `{success: false, message, details?, stack?}`.
    pub fn envelope(&self) -> serde_json::Value {
        let mut body = serde_json::json!({
            "success": false,
            "message": self.message(),
        });
        if !self.details().is_empty() {
            body["details"] = serde_json::json!(self.details());
        }
        if expose_stack() {
            if let Some(stack) = self.source_chain() {
                body["stack"] = serde_json::Value::String(stack);
            }
        }
        body
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(self.envelope())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::kind::ErrorKind;

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let app_err: AppError = json_err.into();
        assert_eq!(app_err.kind(), ErrorKind::BadRequest);
    }

    #[cfg(feature = "axum")]
    #[test]
    fn test_envelope_shape() {
        use crate::error::app_error::FieldError;

        let err = AppError::validation(vec![FieldError::new("title", "Title must be 5-120 characters")]);
        let body = err.envelope();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Validation failed");
        assert_eq!(body["details"][0]["field"], "title");

        let bare = AppError::not_found("Post not found").envelope();
        assert!(bare.get("details").is_none());
    }
}
