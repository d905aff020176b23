//! Request validation glue.
//!
//! DTOs declare their rules with `#[derive(validator::Validate)]`. This module
//! turns a failed run into the uniform `ValidationFailed` error and hosts
//! the rule helpers shared by several crates.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::app_error::{AppError, AppResult, FieldError};

/// Run the declared rules and collect every failure.
pub fn validate<T: Validate>(input: &T) -> AppResult<()> {
    input
        .validate()
        .map_err(|errors| AppError::validation(field_errors(&errors)))
}

/// Flatten validator output into `{field, message}` pairs.
///
/// Ordered by field name; within a field, rules keep declaration order.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<(String, Vec<FieldError>)> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let field = field.to_string();
            let list = errs
                .iter()
                .map(|e| {
                    let message = e
                        .message
                        .clone()
                        .unwrap_or_else(|| format!("Invalid value for {field}").into());
                    FieldError::new(field.clone(), message)
                })
                .collect();
            (field, list)
        })
        .collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    fields.into_iter().flat_map(|(_, list)| list).collect()
}

/// Build a rule failure with a client-facing message.
pub fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

// ============================================================================
// Shared rules
// ============================================================================

/// At least one ASCII digit.
pub fn contains_digit(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_digit())
}

/// Well-formed absolute URL with a host.
pub fn is_absolute_url(value: &str) -> bool {
    url::Url::parse(value)
        .map(|u| u.has_host() && matches!(u.scheme(), "http" | "https" | "ftp"))
        .unwrap_or(false)
}

// ============================================================================
// Deserialization helpers
// ============================================================================

/// Read an optional text field from any JSON value.
///
/// Numbers and booleans become their text so a mistyped field is still
/// judged by its rules and reported against its name. Arrays and objects
/// become their JSON text. `null` counts as absent.
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    })
}

/// Like [`text`], with surrounding whitespace trimmed.
pub fn trimmed<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text(deserializer)?.map(|s| s.trim().to_string()))
}
