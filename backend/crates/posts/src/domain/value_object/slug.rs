//! URL slug derived from a post title.
//!
//! Accented Latin letters are folded to ASCII (`é` becomes `e`) and a few
//! symbols are spelled out (`&` becomes `and`). Whitespace and `-` separate
//! words; any other punctuation is deleted, so `What's` becomes `whats`.
//! Characters with no ASCII form are dropped.

use std::fmt;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Used when nothing of the title survives.
pub const FALLBACK_SLUG: &str = "post";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slug(String);

/// Letters NFKD leaves alone and symbols that read as words.
fn spelled(c: char) -> Option<&'static str> {
    let s = match c {
        'ß' => "ss",
        'æ' | 'Æ' => "ae",
        'œ' | 'Œ' => "oe",
        'ø' | 'Ø' => "o",
        'đ' | 'Đ' | 'ð' | 'Ð' => "d",
        'ł' | 'Ł' => "l",
        'þ' | 'Þ' => "th",
        'ı' => "i",
        '&' => " and ",
        '|' => " or ",
        '<' => " less ",
        '>' => " greater ",
        '%' => " percent ",
        '€' => " euro ",
        '£' => " pound ",
        '¥' => " yen ",
        '♥' => " love ",
        '∞' => " infinity ",
        _ => return None,
    };
    Some(s)
}

/// ASCII rendition of `title`, still mixed case and punctuated.
fn fold(title: &str) -> String {
    let mut folded = String::with_capacity(title.len());
    for c in title.chars() {
        match spelled(c) {
            Some(s) => folded.push_str(s),
            None => folded.extend(std::iter::once(c).nfkd().filter(|d| !is_combining_mark(*d))),
        }
    }
    folded
}

impl Slug {
    /// The base slug for a title.
    pub fn from_title(title: &str) -> Self {
        let folded = fold(title);
        let mut slug = String::with_capacity(folded.len());
        let mut pending_separator = false;

        for c in folded.chars() {
            if c.is_ascii_alphanumeric() {
                if pending_separator && !slug.is_empty() {
                    slug.push('-');
                }
                pending_separator = false;
                slug.push(c.to_ascii_lowercase());
            } else if c.is_whitespace() || c == '-' {
                pending_separator = true;
            }
        }

        if slug.is_empty() {
            slug.push_str(FALLBACK_SLUG);
        }
        Self(slug)
    }

    /// `n`-th candidate: the base itself, then `base-1`, `base-2`, ...
    pub fn candidate(&self, n: u32) -> Self {
        if n == 0 {
            self.clone()
        } else {
            Self(format!("{}-{n}", self.0))
        }
    }

    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
