//! Password Hashing and Verification
//!
//! - Argon2id hashing (memory-hard, recommended by OWASP)
//! - Zeroization of clear text in memory
//! - Unicode NFKC normalization before hashing
//! - Optional application-wide pepper
//!
//! The policy enforced by [`ClearTextPassword::new`] is the account policy:
//! at least [`MIN_PASSWORD_LENGTH`] characters and at least one digit.
//! Login attempts use [`ClearTextPassword::candidate`], which skips the policy
//! so an old password that predates a rule change can still be checked.

use std::fmt;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Constants
// ============================================================================

/// Minimum password length, in Unicode scalar values
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum password length
pub const MAX_PASSWORD_LENGTH: usize = 128;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters")]
    TooLong { max: usize, actual: usize },

    #[error("Password must contain at least one number")]
    MissingDigit,

    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    /// Control characters other than space, tab and newline
    #[error("Password contains invalid control characters")]
    InvalidCharacter,
}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// ## Security
/// - Implements `Zeroize` and `ZeroizeOnDrop`
/// - Does not implement `Clone` to prevent accidental copies
/// - Debug output is redacted
///
/// ## Examples
/// ```rust
/// use platform::password::ClearTextPassword;
///
/// let password = ClearTextPassword::new("hunter42".to_string()).unwrap();
/// assert!(ClearTextPassword::new("hunter".to_string()).is_err());
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a new password that satisfies the account policy.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let candidate = Self::candidate(raw);
        let normalized = candidate.0.as_str();

        if normalized.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        // Count Unicode code points (not bytes)
        let char_count = normalized.chars().count();

        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if normalized
            .chars()
            .any(|ch| ch.is_control() && ch != '\t' && ch != '\n')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        if !normalized.chars().any(|ch| ch.is_ascii_digit()) {
            return Err(PasswordPolicyError::MissingDigit);
        }

        Ok(candidate)
    }

    /// Normalize without applying the policy. Used for verification only.
    pub fn candidate(mut raw: String) -> Self {
        let normalized: String = raw.nfkc().collect();
        raw.zeroize();
        Self(normalized)
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    fn peppered(&self, pepper: Option<&[u8]>) -> Vec<u8> {
        let mut combined = self.as_bytes().to_vec();
        if let Some(p) = pepper {
            combined.extend_from_slice(p);
        }
        combined
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hasher
// ============================================================================

/// Argon2id hasher with an optional pepper.
///
/// `Default` uses the OWASP parameters (m=19456 KiB, t=2, p=1).
/// [`PasswordHasherConfig::fast`] exists for tests; verification always reads
/// the parameters back out of the stored PHC string.
#[derive(Clone)]
pub struct PasswordHasherConfig {
    params: Params,
    pepper: Option<Vec<u8>>,
}

impl Default for PasswordHasherConfig {
    fn default() -> Self {
        Self {
            params: Params::default(),
            pepper: None,
        }
    }
}

impl PasswordHasherConfig {
    /// Minimal-cost parameters. Never use outside tests.
    pub fn fast() -> Self {
        Self {
            params: Params::new(Params::MIN_M_COST, 1, 1, None).unwrap_or_default(),
            pepper: None,
        }
    }

    pub fn with_pepper(mut self, pepper: Option<Vec<u8>>) -> Self {
        self.pepper = pepper.filter(|p| !p.is_empty());
        self
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash the password, producing a PHC string.
    pub fn hash(&self, password: &ClearTextPassword) -> Result<HashedPassword, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(&password.peppered(self.pepper.as_deref()), &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            hash: hash.to_string(),
        })
    }

    /// Verify a password against a stored hash.
    pub fn verify(&self, password: &ClearTextPassword, hashed: &HashedPassword) -> bool {
        let Ok(parsed) = PasswordHash::new(&hashed.hash) else {
            return false;
        };
        // Argon2 uses constant-time comparison internally
        self.argon2()
            .verify_password(&password.peppered(self.pepper.as_deref()), &parsed)
            .is_ok()
    }
}

impl fmt::Debug for PasswordHasherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHasherConfig")
            .field("m_cost", &self.params.m_cost())
            .field("t_cost", &self.params.t_cost())
            .field("pepper", &self.pepper.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Hashed password in PHC string format
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Create from PHC string (e.g., from database)
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();
        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { hash })
    }

    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_too_short() {
        let result = ClearTextPassword::new("ab1".to_string());
        assert!(matches!(
            result,
            Err(PasswordPolicyError::TooShort { min: 6, actual: 3 })
        ));
    }

    #[test]
    fn test_password_too_long() {
        let long_password = format!("{}1", "a".repeat(MAX_PASSWORD_LENGTH));
        let result = ClearTextPassword::new(long_password);
        assert!(matches!(result, Err(PasswordPolicyError::TooLong { .. })));
    }

    #[test]
    fn test_password_needs_digit() {
        let result = ClearTextPassword::new("abcdefgh".to_string());
        assert_eq!(result.unwrap_err(), PasswordPolicyError::MissingDigit);
    }

    #[test]
    fn test_password_whitespace_only() {
        let result = ClearTextPassword::new("        ".to_string());
        assert!(matches!(
            result,
            Err(PasswordPolicyError::EmptyOrWhitespace)
        ));
    }

    #[test]
    fn test_valid_passwords() {
        assert!(ClearTextPassword::new("secret1".to_string()).is_ok());
        assert!(ClearTextPassword::new("パスワード12".to_string()).is_ok());
    }

    #[test]
    fn test_nfkc_makes_fullwidth_digits_count() {
        // U+FF11 FULLWIDTH DIGIT ONE normalizes to '1'
        assert!(ClearTextPassword::new("abcdef\u{FF11}".to_string()).is_ok());
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasherConfig::fast();
        let password = ClearTextPassword::new("TestPassword123".to_string()).unwrap();
        let hashed = hasher.hash(&password).unwrap();

        assert!(hasher.verify(&password, &hashed));
        assert!(!hasher.verify(&ClearTextPassword::candidate("WrongPassword123".into()), &hashed));
    }

    #[test]
    fn test_hash_with_pepper() {
        let peppered = PasswordHasherConfig::fast().with_pepper(Some(b"pepper".to_vec()));
        let plain = PasswordHasherConfig::fast();
        let password = ClearTextPassword::new("TestPassword123".to_string()).unwrap();
        let hashed = peppered.hash(&password).unwrap();

        assert!(peppered.verify(&password, &hashed));
        assert!(!plain.verify(&password, &hashed));
    }

    #[test]
    fn test_verify_reads_params_from_hash() {
        let password = ClearTextPassword::new("TestPassword123".to_string()).unwrap();
        let hashed = PasswordHasherConfig::fast().hash(&password).unwrap();
        assert!(PasswordHasherConfig::default().verify(&password, &hashed));
    }

    #[test]
    fn test_phc_string_roundtrip() {
        let hasher = PasswordHasherConfig::fast();
        let password = ClearTextPassword::new("TestPassword123".to_string()).unwrap();
        let hashed = hasher.hash(&password).unwrap();

        let restored = HashedPassword::from_phc_string(hashed.as_phc_string()).unwrap();
        assert!(hasher.verify(&password, &restored));
        assert!(restored.as_phc_string().starts_with("$argon2id$"));
    }

    #[test]
    fn test_invalid_phc_string() {
        assert!(HashedPassword::from_phc_string("not_a_valid_hash").is_err());
    }

    #[test]
    fn test_debug_redaction() {
        let password = ClearTextPassword::candidate("secret".to_string());
        let debug_output = format!("{:?}", password);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("secret"));
    }
}
