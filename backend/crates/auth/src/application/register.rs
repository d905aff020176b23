//! Register Use Case
//!
//! Creates a new user account and signs them in.

use std::sync::Arc;

use kernel::error::app_error::FieldError;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Register output
#[derive(Debug)]
pub struct RegisterOutput {
    pub user: User,
    pub token: String,
}

/// Register use case
pub struct RegisterUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> RegisterUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        let username = UserName::new(&input.username)
            .map_err(|e| AuthError::invalid("username", e.message()))?;
        let email = Email::new(input.email).map_err(|e| AuthError::invalid("email", e.to_string()))?;
        let raw_password = RawPassword::new("password", input.password)?;

        // Both conflicts are reported together, ordered by field name
        let mut taken = Vec::new();
        if self.user_repo.email_taken(&email, None).await? {
            taken.push(FieldError::new("email", "Email already registered"));
        }
        if self.user_repo.username_taken(&username, None).await? {
            taken.push(FieldError::new("username", "Username already taken"));
        }
        if !taken.is_empty() {
            return Err(AuthError::ValidationFailed(taken));
        }

        let password = UserPassword::from_raw(&raw_password, &self.config.hasher)?;
        let user = User::new(username, email, password);

        // A concurrent registration can still win here; the store reports DuplicateKey
        self.user_repo.create(&user).await?;

        let token = self.config.tokens.issue(&user.id);

        tracing::info!(
            user_id = %user.id,
            username = %user.username,
            "User registered"
        );

        Ok(RegisterOutput { user, token })
    }
}
