//! Sanitizing and validating extractors.
//!
//! Handlers take `ValidatedJson<T>` / `ValidatedQuery<T>` instead of the
//! plain axum extractors. Input is cleaned first, then deserialized, then run
//! through the DTO's declared rules. Any failure short-circuits with an
//! [`AppError`] envelope before the handler body runs.

use std::collections::HashMap;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::Validate;

use crate::error::app_error::AppError;
use crate::sanitize::{clean_str, clean_value};
use crate::validation::validate;

/// Sanitized, validated JSON body.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(raw) = Json::<Value>::from_request(req, state)
            .await
            .map_err(json_rejection)?;

        let input: T = serde_json::from_value(clean_value(raw))?;
        validate(&input)?;
        Ok(Self(input))
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    tracing::debug!(error = %rejection, "Rejected JSON body");
    if rejection.status().as_u16() == 413 {
        AppError::payload_too_large("Request body too large")
    } else {
        AppError::bad_request(rejection.body_text())
    }
}

/// Sanitized, validated query string.
///
/// Every parameter arrives as a string; DTOs parse numbers in their own
/// rules so a malformed value yields a field message rather than a 400
/// without details.
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;

        let object: Map<String, Value> = raw
            .into_iter()
            .map(|(k, v)| (clean_str(&k), Value::String(clean_str(&v))))
            .collect();

        let input: T = serde_json::from_value(Value::Object(object))?;
        validate(&input)?;
        Ok(Self(input))
    }
}

/// A single sanitized path segment.
#[derive(Debug, Clone)]
pub struct CleanPath(pub String);

impl<S> FromRequestParts<S> for CleanPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;
        Ok(Self(clean_str(&raw)))
    }
}
