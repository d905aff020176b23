//! Email Value Object
//!
//! Represents a validated, lowercased email address. Format checking only;
//! no confirmation mail is sent.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Maximum email length (per RFC 5321)
const EMAIL_MAX_LENGTH: usize = 254;

pub const EMAIL_MESSAGE: &str = "Please provide a valid email";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Please provide a valid email")]
pub struct InvalidEmail;

/// Email address value object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Trim, lowercase and validate
    pub fn new(email: impl Into<String>) -> Result<Self, InvalidEmail> {
        let email = email.into().trim().to_lowercase();

        if email.is_empty() || email.len() > EMAIL_MAX_LENGTH || !Self::is_valid_format(&email) {
            return Err(InvalidEmail);
        }

        Ok(Self(email))
    }

    /// Basic email format validation
    fn is_valid_format(email: &str) -> bool {
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };

        if local.is_empty() || local.len() > 64 || local.chars().any(char::is_whitespace) {
            return false;
        }

        if domain.is_empty() || domain.contains('@') || !domain.contains('.') {
            return false;
        }

        if !domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        {
            return false;
        }

        // Domain shouldn't start or end with dot or hyphen, nor hold empty labels
        if domain.starts_with(['.', '-']) || domain.ends_with(['.', '-']) || domain.contains("..") {
            return false;
        }

        true
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Email {
    type Err = InvalidEmail;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Email::new(s)
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
