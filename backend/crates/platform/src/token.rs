//! Bearer Token Signing
//!
//! Stateless HS256 tokens in compact JWS form:
//! `base64url(header) "." base64url(claims) "." base64url(hmac_sha256)`.
//!
//! There is no server-side session store and no revocation list; a token is
//! valid until its `exp` claim passes.

use chrono::{DateTime, Duration, Utc};
use hmac::digest::{Key, KeyInit};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use crate::crypto::{from_base64url, random_bytes, to_base64url};

type HmacSha256 = Hmac<Sha256>;

/// Minimum signing secret length in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Default lifetime: 7 days.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

const ALGORITHM: &str = "HS256";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Not three segments, bad base64, bad JSON, or an unexpected `alg`.
    #[error("Malformed token")]
    Malformed,

    #[error("Token signature mismatch")]
    BadSignature,

    #[error("Token expired")]
    Expired,

    #[error("Token secret must be at least 32 bytes")]
    WeakSecret,
}

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

/// Registered claims carried by every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id
    pub sub: String,
    /// Issued at, seconds since epoch
    pub iat: i64,
    /// Expires at, seconds since epoch
    pub exp: i64,
}

/// Issues and verifies tokens with one shared secret.
#[derive(Clone)]
pub struct TokenSigner {
    mac: HmacSha256,
    ttl: Duration,
}

impl TokenSigner {
    pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, TokenError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(TokenError::WeakSecret);
        }
        let mac = <HmacSha256 as KeyInit>::new_from_slice(secret).map_err(|_| TokenError::WeakSecret)?;
        Ok(Self { mac, ttl })
    }

    /// Signer with a fresh random secret. Tokens do not survive a restart.
    pub fn random(ttl: Duration) -> Self {
        // One full SHA-256 block
        let key = random_bytes(64);
        let mac = <HmacSha256 as KeyInit>::new(Key::<HmacSha256>::from_slice(&key));
        Self { mac, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, subject: &str) -> String {
        self.issue_at(subject, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> String {
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        let header = Header {
            alg: ALGORITHM.to_string(),
            typ: "JWT".to_string(),
        };

        // Serializing plain structs of strings and integers cannot fail.
        let header_json = serde_json::to_vec(&header).unwrap_or_default();
        let claims_json = serde_json::to_vec(&claims).unwrap_or_default();

        let signing_input = format!("{}.{}", to_base64url(&header_json), to_base64url(&claims_json));
        let signature = self.sign(signing_input.as_bytes());
        format!("{signing_input}.{}", to_base64url(&signature))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify signature first, then expiry against `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let mut parts = token.split('.');
        let (Some(header_b64), Some(claims_b64), Some(sig_b64), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenError::Malformed);
        };

        let header: Header = decode_segment(header_b64)?;
        if header.alg != ALGORITHM {
            return Err(TokenError::Malformed);
        }

        let signature = from_base64url(sig_b64).map_err(|_| TokenError::Malformed)?;
        let mut mac = self.mac.clone();
        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(claims_b64.as_bytes());
        // Constant-time comparison
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let claims: Claims = decode_segment(claims_b64)?;
        if claims.exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }

    fn sign(&self, data: &[u8]) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(data);
        mac.finalize().into_bytes().to_vec()
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("secret", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

fn decode_segment<T: serde::de::DeserializeOwned>(segment: &str) -> Result<T, TokenError> {
    let bytes = from_base64url(segment).map_err(|_| TokenError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)
}
