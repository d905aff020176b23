//! Success envelope.
//!
//! Every successful JSON response has the shape
//! `{"success": true, "message"?: "...", "data"?: {...}}`. Failures use the
//! matching error envelope rendered by [`AppError`](crate::error::app_error::AppError).

use std::borrow::Cow;

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    #[serde(skip)]
    status: u16,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<Cow<'static, str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// 200 with a payload.
    pub fn ok(data: T) -> Self {
        Self {
            status: 200,
            success: true,
            message: None,
            data: Some(data),
        }
    }

    /// 201 with a payload.
    pub fn created(data: T) -> Self {
        Self {
            status: 201,
            ..Self::ok(data)
        }
    }

    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn status(&self) -> u16 {
        self.status
    }
}

impl ApiResponse<()> {
    /// 200 with only a message.
    pub fn message(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            status: 200,
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

#[cfg(feature = "axum")]
impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_envelope() {
        let body = serde_json::to_value(ApiResponse::ok(json!({"id": 1}))).unwrap();
        assert_eq!(body, json!({"success": true, "data": {"id": 1}}));
    }

    #[test]
    fn test_created_with_message() {
        let resp = ApiResponse::created(json!({"post": {}})).with_message("Post created successfully");
        assert_eq!(resp.status(), 201);
        let body = serde_json::to_value(resp).unwrap();
        assert_eq!(body["message"], "Post created successfully");
        assert_eq!(body["success"], true);
    }

    #[test]
    fn test_message_only() {
        let body = serde_json::to_value(ApiResponse::message("Account deleted successfully")).unwrap();
        assert_eq!(body, json!({"success": true, "message": "Account deleted successfully"}));
    }
}
