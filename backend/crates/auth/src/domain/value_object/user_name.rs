//! User Name Value Object
//!
//! ユーザー名は、ユーザーを識別するための**公開識別子（ハンドル）**。
//! ログイン、投稿の著者表示、著者別の投稿一覧に使用される。
//!
//! ## 設計方針
//! - ASCII英数字と `_` のみ許可
//! - 大文字小文字は保持し、一意性も完全一致で判定する
//! - NFKC正規化 → trim → 検証 の順で処理
//!
//! ## 不変条件
//! - 長さ: 3〜30文字（正規化後）
//! - 途中の空白禁止

use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

// ============================================================================
// Constants
// ============================================================================

/// Minimum length for user name (in characters)
pub const USER_NAME_MIN_LENGTH: usize = 3;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 30;

pub const LENGTH_MESSAGE: &str = "Username must be 3-30 characters";
pub const CHARSET_MESSAGE: &str = "Username can only contain letters, numbers, and underscores";

// ============================================================================
// Error Types
// ============================================================================

/// Error returned when user name validation fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserNameError {
    /// User name is empty after normalization
    Empty,

    TooShort { length: usize },

    TooLong { length: usize },

    /// Anything outside `[A-Za-z0-9_]`, whitespace included
    InvalidCharacter { char: char, position: usize },
}

impl UserNameError {
    /// Client-facing message, shared with the request validator.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty | Self::TooShort { .. } | Self::TooLong { .. } => LENGTH_MESSAGE,
            Self::InvalidCharacter { .. } => CHARSET_MESSAGE,
        }
    }
}

impl fmt::Display for UserNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCharacter { char, position } => {
                write!(f, "{} ('{char}' at position {position})", CHARSET_MESSAGE)
            }
            other => f.write_str(other.message()),
        }
    }
}

impl std::error::Error for UserNameError {}

/// True for characters allowed in a user name.
pub fn is_user_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

// ============================================================================
// UserName Value Object
// ============================================================================

/// Validated user name
///
/// # Invariants
/// - Length between USER_NAME_MIN_LENGTH and USER_NAME_MAX_LENGTH
/// - Contains only ASCII alphanumerics and `_`
///
/// Case is preserved; `Alice` and `alice` are distinct users.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Create a new UserName from raw input
    pub fn new(input: impl AsRef<str>) -> Result<Self, UserNameError> {
        let normalized = Self::normalize(input.as_ref());
        Self::validate(&normalized)?;
        Ok(Self(normalized))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from database values (assumes already validated)
    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Trim and NFKC, case preserved
    fn normalize(input: &str) -> String {
        input.nfkc().collect::<String>().trim().to_string()
    }

    fn validate(name: &str) -> Result<(), UserNameError> {
        if name.is_empty() {
            return Err(UserNameError::Empty);
        }

        let length = name.chars().count();
        if length < USER_NAME_MIN_LENGTH {
            return Err(UserNameError::TooShort { length });
        }
        if length > USER_NAME_MAX_LENGTH {
            return Err(UserNameError::TooLong { length });
        }

        if let Some((position, char)) = name.chars().enumerate().find(|(_, c)| !is_user_name_char(*c)) {
            return Err(UserNameError::InvalidCharacter { char, position });
        }

        Ok(())
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserName({:?})", self.0)
    }
}

impl TryFrom<String> for UserName {
    type Error = UserNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for UserName {
    type Error = UserNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod normalization {
        use super::*;

        #[test]
        fn test_case_preserved() {
            let name = UserName::new("AliceSmith").unwrap();
            assert_eq!(name.as_str(), "AliceSmith");
            assert_ne!(name, UserName::new("alicesmith").unwrap());
        }

        #[test]
        fn test_trimmed() {
            assert_eq!(UserName::new("  bob_1  ").unwrap().as_str(), "bob_1");
        }

        #[test]
        fn test_nfkc_normalization() {
            // Fullwidth ＡＢＣ normalizes to ASCII ABC
            assert_eq!(UserName::new("ＡＢＣ").unwrap().as_str(), "ABC");
        }
    }

    mod length_validation {
        use super::*;

        #[test]
        fn test_empty_fails() {
            assert_eq!(UserName::new("").unwrap_err(), UserNameError::Empty);
            assert_eq!(UserName::new("   ").unwrap_err(), UserNameError::Empty);
        }

        #[test]
        fn test_too_short() {
            let err = UserName::new("ab").unwrap_err();
            assert_eq!(err, UserNameError::TooShort { length: 2 });
            assert_eq!(err.message(), "Username must be 3-30 characters");
        }

        #[test]
        fn test_bounds() {
            assert!(UserName::new("abc").is_ok());
            assert!(UserName::new("a".repeat(30)).is_ok());
            assert!(matches!(
                UserName::new("a".repeat(31)),
                Err(UserNameError::TooLong { length: 31 })
            ));
        }
    }

    mod character_validation {
        use super::*;

        #[test]
        fn test_valid_characters() {
            assert!(UserName::new("user_123").is_ok());
            assert!(UserName::new("___").is_ok());
            assert!(UserName::new("123").is_ok());
        }

        #[test]
        fn test_invalid_special_char() {
            for bad in ["user.name", "user-name", "user+x", "user@x"] {
                let err = UserName::new(bad).unwrap_err();
                assert_eq!(err.message(), CHARSET_MESSAGE, "{bad}");
            }
        }

        #[test]
        fn test_whitespace_in_middle_fails() {
            assert!(matches!(
                UserName::new("user name"),
                Err(UserNameError::InvalidCharacter { char: ' ', position: 4 })
            ));
        }

        #[test]
        fn test_non_ascii_fails() {
            assert!(UserName::new("ユーザー名").is_err());
        }
    }

    mod serialization {
        use super::*;

        #[test]
        fn test_serialize() {
            let name = UserName::new("Alice").unwrap();
            assert_eq!(serde_json::to_string(&name).unwrap(), "\"Alice\"");
        }

        #[test]
        fn test_deserialize_invalid() {
            assert!(serde_json::from_str::<UserName>("\"a b\"").is_err());
        }
    }
}
