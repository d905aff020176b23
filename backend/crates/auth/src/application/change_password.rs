//! Change Password Use Case
//!
//! Verifies the current password, stores the new hash and reissues a token.
//! Previously issued tokens stay valid until they expire.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    user_id::UserId,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

pub struct ChangePasswordInput {
    pub user_id: UserId,
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug)]
pub struct ChangePasswordOutput {
    pub token: String,
}

pub struct ChangePasswordUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> ChangePasswordUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: ChangePasswordInput) -> AuthResult<ChangePasswordOutput> {
        let new_password = RawPassword::new("newPassword", input.new_password)?;
        let current = RawPassword::candidate(input.current_password);

        let mut user = self
            .user_repo
            .find_by_id(&input.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !user.password.verify(&current, &self.config.hasher) {
            return Err(AuthError::WrongCurrentPassword);
        }

        user.set_password(UserPassword::from_raw(&new_password, &self.config.hasher)?);
        self.user_repo.update(&user).await?;

        tracing::info!(user_id = %user.id, "Password changed");

        Ok(ChangePasswordOutput {
            token: self.config.tokens.issue(&user.id),
        })
    }
}
