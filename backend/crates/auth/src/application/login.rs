//! Login Use Case
//!
//! Authenticates by email or username and issues a bearer token.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_password::RawPassword;
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    /// Email or username
    pub login: String,
    pub password: String,
}

/// Login output
#[derive(Debug)]
pub struct LoginOutput {
    pub user: User,
    pub token: String,
}

/// Login use case
pub struct LoginUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> LoginUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        let login = input.login.trim();
        let candidate = RawPassword::candidate(input.password);

        // Unknown login and wrong password are indistinguishable to the caller
        let Some(user) = self.user_repo.find_by_login(login).await? else {
            tracing::debug!(login = %login, "Login for unknown account");
            return Err(AuthError::InvalidCredentials);
        };

        if !user.password.verify(&candidate, &self.config.hasher) {
            tracing::debug!(user_id = %user.id, "Login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.config.tokens.issue(&user.id);

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginOutput { user, token })
    }
}
