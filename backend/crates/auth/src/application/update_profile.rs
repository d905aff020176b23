//! Update Profile Use Case
//!
//! Changes username and/or email. A rename is fanned out to the user's
//! authored content after the user row is written.

use std::sync::Arc;

use crate::domain::entity::user::User;
use crate::domain::repository::{AuthoredContent, UserRepository};
use crate::domain::value_object::{email::Email, user_id::UserId, user_name::UserName};
use crate::error::{AuthError, AuthResult};

/// Update profile input. Absent fields are left unchanged.
pub struct UpdateProfileInput {
    pub user_id: UserId,
    pub username: Option<String>,
    pub email: Option<String>,
}

pub struct UpdateProfileUseCase<U, C>
where
    U: UserRepository,
    C: AuthoredContent,
{
    user_repo: Arc<U>,
    content: Arc<C>,
}

impl<U, C> UpdateProfileUseCase<U, C>
where
    U: UserRepository,
    C: AuthoredContent,
{
    pub fn new(user_repo: Arc<U>, content: Arc<C>) -> Self {
        Self { user_repo, content }
    }

    pub async fn execute(&self, input: UpdateProfileInput) -> AuthResult<User> {
        let username = input
            .username
            .filter(|s| !s.trim().is_empty())
            .map(|s| UserName::new(s).map_err(|e| AuthError::invalid("username", e.message())))
            .transpose()?;
        let email = input
            .email
            .filter(|s| !s.trim().is_empty())
            .map(|s| Email::new(s).map_err(|e| AuthError::invalid("email", e.to_string())))
            .transpose()?;

        if let Some(username) = &username {
            if self.user_repo.username_taken(username, Some(&input.user_id)).await? {
                return Err(AuthError::UsernameTaken);
            }
        }
        if let Some(email) = &email {
            if self.user_repo.email_taken(email, Some(&input.user_id)).await? {
                return Err(AuthError::EmailTaken);
            }
        }

        let mut user = self
            .user_repo
            .find_by_id(&input.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let renamed = username.clone();
        if let Some(username) = username {
            user.rename(username);
        }
        if let Some(email) = email {
            user.set_email(email);
        }

        self.user_repo.update(&user).await?;

        if let Some(username) = renamed {
            let touched = self.content.rename_author(&user.id, &username).await?;
            tracing::info!(user_id = %user.id, posts = touched, "Author name re-synced");
        }

        tracing::info!(user_id = %user.id, "Profile updated");

        Ok(user)
    }
}
