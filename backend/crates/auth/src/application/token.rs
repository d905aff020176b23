//! Token Service
//!
//! Binds the platform signer to user ids and maps its failures onto the
//! gate's error vocabulary.

use platform::token::{TokenError, TokenSigner};

use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone)]
pub struct TokenService {
    signer: TokenSigner,
}

impl TokenService {
    pub fn new(signer: TokenSigner) -> Self {
        Self { signer }
    }

    /// Issue a token whose subject is the user id.
    pub fn issue(&self, user_id: &UserId) -> String {
        self.signer.issue(&user_id.to_string())
    }

    /// Verify a token and return its subject.
    ///
    /// Expiry maps to `ExpiredToken`; every other failure, including a
    /// subject that is not a user id, maps to `InvalidToken`.
    pub fn verify(&self, token: &str) -> AuthResult<UserId> {
        let claims = self.signer.verify(token).map_err(|e| match e {
            TokenError::Expired => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken,
        })?;

        claims.sub.parse().map_err(|_| AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn service(ttl: Duration) -> TokenService {
        TokenService::new(TokenSigner::new(&[3u8; 32], ttl).unwrap())
    }

    #[test]
    fn test_roundtrip_returns_user_id() {
        let tokens = service(Duration::days(7));
        let id = UserId::new();
        assert_eq!(tokens.verify(&tokens.issue(&id)).unwrap(), id);
    }

    #[test]
    fn test_expired_and_invalid_are_distinct() {
        let expired = service(Duration::seconds(-10));
        let token = expired.issue(&UserId::new());
        assert!(matches!(expired.verify(&token), Err(AuthError::ExpiredToken)));

        let other = service(Duration::days(7));
        assert!(matches!(other.verify("abc.def.ghi"), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_non_id_subject_is_invalid() {
        let signer = TokenSigner::new(&[3u8; 32], Duration::days(7)).unwrap();
        let token = signer.issue_at("not-an-id", Utc::now());
        let tokens = TokenService::new(signer);
        assert!(matches!(tokens.verify(&token), Err(AuthError::InvalidToken)));
    }
}
