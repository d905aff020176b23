//! Delete Account Use Case
//!
//! Removes the user. Their posts are kept, still carrying the last synced
//! username.

use std::sync::Arc;

use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};

pub struct DeleteAccountUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> DeleteAccountUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, user_id: &UserId) -> AuthResult<()> {
        if !self.user_repo.delete(user_id).await? {
            return Err(AuthError::UserNotFound);
        }

        tracing::info!(user_id = %user_id, "Account deleted");
        Ok(())
    }
}
