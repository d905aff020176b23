//! In-memory Repository
//!
//! Process-local user store for development without a database and for
//! tests. Every operation runs under one lock; uniqueness of username and
//! email is enforced inside it, like the unique indexes in PostgreSQL.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_id::UserId, user_name::UserName};
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Default)]
pub struct InMemoryAuthRepository {
    users: Mutex<HashMap<UserId, User>>,
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AuthResult<MutexGuard<'_, HashMap<UserId, User>>> {
        self.users
            .lock()
            .map_err(|_| AuthError::Internal("user store poisoned".to_string()))
    }

    pub fn len(&self) -> usize {
        self.users.lock().map(|users| users.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The field a write would duplicate, if any.
fn conflict(users: &HashMap<UserId, User>, user: &User) -> Option<&'static str> {
    users.values().filter(|u| u.id != user.id).find_map(|u| {
        if u.username == user.username {
            Some("username")
        } else if u.email == user.email {
            Some("email")
        } else {
            None
        }
    })
}

impl UserRepository for InMemoryAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = self.lock()?;
        if let Some(field) = conflict(&users, user) {
            return Err(AuthError::DuplicateKey {
                field: field.to_string(),
            });
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.lock()?.get(id).cloned())
    }

    async fn find_by_login(&self, login: &str) -> AuthResult<Option<User>> {
        let email = login.to_lowercase();
        Ok(self
            .lock()?
            .values()
            .find(|u| u.email.as_str() == email || u.username.as_str() == login)
            .cloned())
    }

    async fn username_taken(
        &self,
        username: &UserName,
        except: Option<&UserId>,
    ) -> AuthResult<bool> {
        Ok(self
            .lock()?
            .values()
            .any(|u| &u.username == username && Some(&u.id) != except))
    }

    async fn email_taken(&self, email: &Email, except: Option<&UserId>) -> AuthResult<bool> {
        Ok(self
            .lock()?
            .values()
            .any(|u| &u.email == email && Some(&u.id) != except))
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        let mut users = self.lock()?;
        if !users.contains_key(&user.id) {
            return Err(AuthError::UserNotFound);
        }
        if let Some(field) = conflict(&users, user) {
            return Err(AuthError::DuplicateKey {
                field: field.to_string(),
            });
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> AuthResult<bool> {
        Ok(self.lock()?.remove(id).is_some())
    }
}
