//! Post body: trimmed, at least 50 characters. Stored as plain text.

use crate::error::{PostError, PostResult};

pub const CONTENT_MIN_LENGTH: usize = 50;
pub const CONTENT_MESSAGE: &str = "Content must be at least 50 characters";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content(String);

impl Content {
    pub fn new(raw: impl AsRef<str>) -> PostResult<Self> {
        let content = raw.as_ref().trim();
        if content.chars().count() < CONTENT_MIN_LENGTH {
            return Err(PostError::invalid("content", CONTENT_MESSAGE));
        }
        Ok(Self(content.to_string()))
    }

    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
