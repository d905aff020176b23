//! User Password Value Object
//!
//! Domain value objects for user passwords.
//! Delegates to `platform::password` for cryptographic operations.
//!
//! ## Usage
//! ```rust
//! use auth::domain::value_object::user_password::{UserPassword, RawPassword};
//! use platform::password::PasswordHasherConfig;
//!
//! let hasher = PasswordHasherConfig::fast();
//! let raw = RawPassword::new("password", "secret42".to_string()).unwrap();
//! let hashed = UserPassword::from_raw(&raw, &hasher).unwrap();
//! assert!(hashed.verify(&raw, &hasher));
//! ```

use platform::password::{
    ClearTextPassword, HashedPassword, PasswordHasherConfig, PasswordPolicyError,
};
use std::fmt;

use crate::error::{AuthError, AuthResult};

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input
///
/// Memory is automatically zeroized when dropped.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Create a password that satisfies the account policy.
    ///
    /// `field` names the request field the value came from, so a failure is
    /// reported against it.
    pub fn new(field: &'static str, raw: String) -> AuthResult<Self> {
        let clear_text = ClearTextPassword::new(raw).map_err(|e| {
            let message = match (&e, field) {
                (PasswordPolicyError::TooShort { .. }, "newPassword") => {
                    "New password must be at least 6 characters".to_string()
                }
                (PasswordPolicyError::EmptyOrWhitespace, _) => {
                    "Password must be at least 6 characters".to_string()
                }
                _ => e.to_string(),
            };
            AuthError::invalid(field, message)
        })?;

        Ok(Self(clear_text))
    }

    /// A login or confirmation attempt. No policy applied.
    pub fn candidate(raw: String) -> Self {
        Self(ClearTextPassword::candidate(raw))
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// Hashed user password in Argon2id PHC string format.
///
/// Never serialized into a response.
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    pub fn from_raw(raw: &RawPassword, hasher: &PasswordHasherConfig) -> AuthResult<Self> {
        let hashed = hasher
            .hash(raw.inner())
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        Ok(Self(hashed))
    }

    /// Create from PHC string (from database)
    pub fn from_phc_string(phc_string: impl Into<String>) -> AuthResult<Self> {
        let hashed = HashedPassword::from_phc_string(phc_string)
            .map_err(|_| AuthError::Internal("Invalid password hash in database".to_string()))?;
        Ok(Self(hashed))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// Constant-time verification of a raw password against this hash
    pub fn verify(&self, raw: &RawPassword, hasher: &PasswordHasherConfig) -> bool {
        hasher.verify(raw.inner(), &self.0)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
