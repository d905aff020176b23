//! Authenticate Use Case
//!
//! Resolves a bearer token into the user it names.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

pub struct AuthenticateUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> AuthenticateUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    /// `None` token means no credentials were presented at all.
    pub async fn execute(&self, token: Option<&str>) -> AuthResult<User> {
        let token = token.ok_or(AuthError::NotLoggedIn)?;
        let user_id = self.config.tokens.verify(token)?;

        self.user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::UserGone)
    }
}
