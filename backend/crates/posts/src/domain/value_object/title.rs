//! Post title: trimmed, 5 to 120 characters.

use std::fmt;

use crate::error::{PostError, PostResult};

pub const TITLE_MIN_LENGTH: usize = 5;
pub const TITLE_MAX_LENGTH: usize = 120;
pub const TITLE_MESSAGE: &str = "Title must be 5-120 characters";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title(String);

impl Title {
    pub fn new(raw: impl AsRef<str>) -> PostResult<Self> {
        let title = raw.as_ref().trim();
        let length = title.chars().count();
        if !(TITLE_MIN_LENGTH..=TITLE_MAX_LENGTH).contains(&length) {
            return Err(PostError::invalid("title", TITLE_MESSAGE));
        }
        Ok(Self(title.to_string()))
    }

    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_after_trim() {
        assert!(Title::new("  abcd  ").is_err());
        assert_eq!(Title::new("  abcde  ").unwrap().as_str(), "abcde");
        assert!(Title::new("x".repeat(120)).is_ok());
        assert!(Title::new("x".repeat(121)).is_err());
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        assert!(Title::new("日本語です").is_ok());
    }
}
