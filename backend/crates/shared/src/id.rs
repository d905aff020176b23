//! Common ID Types
//!
//! Type-safe ID wrappers for domain entities. An id is 12 bytes: a 4-byte
//! big-endian UNIX timestamp (seconds) followed by 8 random bytes, rendered as
//! 24 lowercase hex characters. Ids generated later sort after earlier ones
//! at second granularity.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Byte length of an id.
pub const ID_LEN: usize = 12;

/// Generic typed ID wrapper
///
/// Usage:
/// ```
/// use kernel::id::{Id, markers};
/// type PostId = Id<markers::Post>;
///
/// let id = PostId::new();
/// assert_eq!(id.to_string().len(), 24);
/// ```
pub struct Id<T> {
    bytes: [u8; ID_LEN],
    _marker: PhantomData<fn() -> T>,
}

/// Error returned when a string is not a 24-character hex id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid id: {0}")]
pub struct IdParseError(pub String);

impl<T> Id<T> {
    /// Create a new id stamped with the current time.
    pub fn new() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        Self::with_timestamp(secs as u32)
    }

    /// Create a new id with an explicit timestamp prefix.
    pub fn with_timestamp(secs: u32) -> Self {
        let mut bytes = [0u8; ID_LEN];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        let tail: [u8; 8] = rand::random();
        bytes[4..].copy_from_slice(&tail);
        Self::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: [u8; ID_LEN]) -> Self {
        Self {
            bytes,
            _marker: PhantomData,
        }
    }

    pub fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.bytes
    }

    /// Seconds since the epoch encoded in the first four bytes.
    pub fn timestamp_secs(&self) -> u32 {
        u32::from_be_bytes([self.bytes[0], self.bytes[1], self.bytes[2], self.bytes[3]])
    }

    /// True when `s` has the id shape: exactly 24 hex digits, any case.
    pub fn is_valid(s: &str) -> bool {
        s.len() == ID_LEN * 2 && s.bytes().all(|b| b.is_ascii_hexdigit())
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.bytes.cmp(&other.bytes)
    }
}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.bytes))
    }
}

impl<T> FromStr for Id<T> {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !Self::is_valid(s) {
            return Err(IdParseError(s.to_string()));
        }
        let mut bytes = [0u8; ID_LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| IdParseError(s.to_string()))?;
        Ok(Self::from_bytes(bytes))
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Marker types for different entity IDs
pub mod markers {
    /// Marker for User IDs
    pub struct User;

    /// Marker for Post IDs
    pub struct Post;
}

#[cfg(test)]
mod tests {
    use super::*;

    type UserId = Id<markers::User>;

    #[test]
    fn test_display_is_24_lowercase_hex() {
        let id = UserId::new();
        let s = id.to_string();
        assert_eq!(s.len(), 24);
        assert!(s.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_parse_accepts_any_case() {
        let id: UserId = "65A1B2C3D4E5F60718293A4B".parse().unwrap();
        assert_eq!(id.to_string(), "65a1b2c3d4e5f60718293a4b");
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        assert!("abc".parse::<UserId>().is_err());
        assert!("zz a1b2c3d4e5f60718293a4b".parse::<UserId>().is_err());
        assert!("65a1b2c3d4e5f60718293a4b00".parse::<UserId>().is_err());
        assert_eq!(
            "my-first-post".parse::<UserId>().unwrap_err().to_string(),
            "Invalid id: my-first-post"
        );
    }

    #[test]
    fn test_timestamp_prefix_orders_ids() {
        let early = UserId::with_timestamp(1_700_000_000);
        let late = UserId::with_timestamp(1_700_000_001);
        assert_eq!(early.timestamp_secs(), 1_700_000_000);
        assert!(early < late);
    }

    #[test]
    fn test_serde_as_string() {
        let id = UserId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        let back: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
