//! API DTOs (Data Transfer Objects)
//!
//! Request bodies declare their rules with `validator`; string fields other
//! than passwords are trimmed while deserializing.

#![allow(non_snake_case)]

use chrono::{DateTime, Utc};
use kernel::validation::{contains_digit, rule_error, text, trimmed};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::entity::user::User;
use crate::domain::value_object::user_name::{CHARSET_MESSAGE, is_user_name_char};

// ============================================================================
// Rules
// ============================================================================

fn username_charset(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(is_user_name_char) {
        Ok(())
    } else {
        Err(rule_error("username_charset", CHARSET_MESSAGE))
    }
}

fn password_digit(value: &str) -> Result<(), ValidationError> {
    if contains_digit(value) {
        Ok(())
    } else {
        Err(rule_error("password_digit", "Password must contain at least one number"))
    }
}

// ============================================================================
// Register
// ============================================================================

/// Register request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(
        required(message = "Username must be 3-30 characters"),
        length(min = 3, max = 30, message = "Username must be 3-30 characters"),
        custom(function = username_charset)
    )]
    pub username: Option<String>,

    #[serde(default, deserialize_with = "trimmed")]
    #[validate(
        required(message = "Please provide a valid email"),
        email(message = "Please provide a valid email")
    )]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "text")]
    #[validate(
        required(message = "Password must be at least 6 characters"),
        length(min = 6, message = "Password must be at least 6 characters"),
        custom(function = password_digit)
    )]
    pub password: Option<String>,
}

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// User name or email
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(
        required(message = "Email or username is required"),
        length(min = 1, message = "Email or username is required")
    )]
    pub login: Option<String>,

    #[serde(default, deserialize_with = "text")]
    #[validate(
        required(message = "Password is required"),
        length(min = 1, message = "Password is required")
    )]
    pub password: Option<String>,
}

// ============================================================================
// Profile
// ============================================================================

/// Update profile request. Absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(
        length(min = 3, max = 30, message = "Username must be 3-30 characters"),
        custom(function = username_charset)
    )]
    pub username: Option<String>,

    #[serde(default, deserialize_with = "trimmed")]
    #[validate(email(message = "Please provide a valid email"))]
    pub email: Option<String>,
}

/// Change password request
///
/// Fields carry their wire names so failures are reported against them.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[serde(default, deserialize_with = "text")]
    #[validate(
        required(message = "Current password is required"),
        length(min = 1, message = "Current password is required")
    )]
    pub currentPassword: Option<String>,

    #[serde(default, deserialize_with = "text")]
    #[validate(
        required(message = "New password must be at least 6 characters"),
        length(min = 6, message = "New password must be at least 6 characters"),
        custom(function = password_digit)
    )]
    pub newPassword: Option<String>,
}

// ============================================================================
// Responses
// ============================================================================

/// Public view of a user. The password hash never leaves the crate.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.to_string(),
            email: user.email.to_string(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// `{user, token}` for register and login
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub user: UserProfile,
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub user: UserProfile,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::validation::validate;
    use serde_json::json;

    fn messages<T: Validate>(input: &T) -> Vec<(String, String)> {
        match validate(input) {
            Ok(()) => Vec::new(),
            Err(e) => e
                .details()
                .iter()
                .map(|d| (d.field.to_string(), d.message.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_register_short_username_and_digitless_password() {
        let req: RegisterRequest = serde_json::from_value(json!({
            "username": "ab",
            "email": "a@example.com",
            "password": "abcdefg"
        }))
        .unwrap();

        assert_eq!(
            messages(&req),
            vec![
                ("password".into(), "Password must contain at least one number".into()),
                ("username".into(), "Username must be 3-30 characters".into()),
            ]
        );
    }

    #[test]
    fn test_register_missing_everything() {
        let req: RegisterRequest = serde_json::from_value(json!({})).unwrap();
        let fields: Vec<String> = messages(&req).into_iter().map(|(f, _)| f).collect();
        assert_eq!(fields, vec!["email", "password", "username"]);
    }

    #[test]
    fn test_register_username_charset() {
        let req: RegisterRequest = serde_json::from_value(json!({
            "username": "bad name",
            "email": "a@example.com",
            "password": "secret1"
        }))
        .unwrap();
        assert_eq!(
            messages(&req),
            vec![("username".into(), CHARSET_MESSAGE.into())]
        );
    }

    #[test]
    fn test_register_trims_username() {
        let req: RegisterRequest = serde_json::from_value(json!({
            "username": "  alice  ",
            "email": " a@example.com ",
            "password": "secret1"
        }))
        .unwrap();
        assert_eq!(req.username.as_deref(), Some("alice"));
        assert!(messages(&req).is_empty());
    }

    #[test]
    fn test_login_requires_both_fields() {
        let req: LoginRequest = serde_json::from_value(json!({"login": "   "})).unwrap();
        assert_eq!(
            messages(&req),
            vec![
                ("login".into(), "Email or username is required".into()),
                ("password".into(), "Password is required".into()),
            ]
        );
    }

    #[test]
    fn test_change_password_camel_case_fields() {
        let req: ChangePasswordRequest = serde_json::from_value(json!({
            "currentPassword": "old",
            "newPassword": "abc"
        }))
        .unwrap();
        assert_eq!(
            messages(&req),
            vec![
                ("newPassword".into(), "New password must be at least 6 characters".into()),
                ("newPassword".into(), "Password must contain at least one number".into()),
            ]
        );
    }

    #[test]
    fn test_update_profile_all_optional() {
        let req: UpdateProfileRequest = serde_json::from_value(json!({})).unwrap();
        assert!(messages(&req).is_empty());
    }
}
