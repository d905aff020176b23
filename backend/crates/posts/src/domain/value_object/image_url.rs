//! Optional cover image URL. Only the URL is stored.

use kernel::validation::is_absolute_url;

use crate::error::{PostError, PostResult};

pub const IMAGE_URL_MESSAGE: &str = "Please provide a valid URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrl(String);

impl ImageUrl {
    /// Blank input means "no image".
    pub fn parse(raw: impl AsRef<str>) -> PostResult<Option<Self>> {
        let url = raw.as_ref().trim();
        if url.is_empty() {
            return Ok(None);
        }
        if !is_absolute_url(url) {
            return Err(PostError::invalid("imageURL", IMAGE_URL_MESSAGE));
        }
        Ok(Some(Self(url.to_string())))
    }

    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_is_none() {
        assert_eq!(ImageUrl::parse("").unwrap(), None);
        assert_eq!(ImageUrl::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_valid_and_invalid() {
        let url = ImageUrl::parse(" https://cdn.example.com/a.png ").unwrap().unwrap();
        assert_eq!(url.as_str(), "https://cdn.example.com/a.png");
        assert!(ImageUrl::parse("not a url").is_err());
    }
}
