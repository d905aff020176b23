//! Application Configuration
//!
//! Configuration for the Auth application layer.

use chrono::Duration;
use platform::password::PasswordHasherConfig;
use platform::token::{DEFAULT_TOKEN_TTL_SECS, TokenError, TokenSigner};

use crate::application::token::TokenService;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Bearer token issue/verify
    pub tokens: TokenService,
    /// Argon2id parameters and optional pepper
    pub hasher: PasswordHasherConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::with_random_secret()
    }
}

impl AuthConfig {
    /// Config from a shared signing secret (32+ bytes)
    pub fn new(
        token_secret: &[u8],
        token_ttl: Duration,
        password_pepper: Option<Vec<u8>>,
    ) -> Result<Self, TokenError> {
        Ok(Self {
            tokens: TokenService::new(TokenSigner::new(token_secret, token_ttl)?),
            hasher: PasswordHasherConfig::default().with_pepper(password_pepper),
        })
    }

    /// Create config with a random token secret (for development)
    pub fn with_random_secret() -> Self {
        Self::with_random_secret_ttl(Duration::seconds(DEFAULT_TOKEN_TTL_SECS), None)
    }

    /// Random per-process secret; tokens die with the process.
    pub fn with_random_secret_ttl(token_ttl: Duration, password_pepper: Option<Vec<u8>>) -> Self {
        Self {
            tokens: TokenService::new(TokenSigner::random(token_ttl)),
            hasher: PasswordHasherConfig::default().with_pepper(password_pepper),
        }
    }

    /// Create config for development
    pub fn development() -> Self {
        Self::with_random_secret()
    }

    /// Swap the hasher, e.g. for low-cost parameters in tests
    pub fn with_hasher(mut self, hasher: PasswordHasherConfig) -> Self {
        self.hasher = hasher;
        self
    }
}
