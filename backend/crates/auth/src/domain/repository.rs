//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::user::User;
use crate::domain::value_object::{email::Email, user_id::UserId, user_name::UserName};
use crate::error::AuthResult;

/// User repository trait
///
/// Writes enforce username and email uniqueness and fail with
/// `AuthError::DuplicateKey` when a concurrent request got there first.
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, id: &UserId) -> AuthResult<Option<User>>;

    /// Find by email (compared lowercased) or exact username
    async fn find_by_login(&self, login: &str) -> AuthResult<Option<User>>;

    /// True if another user (not `except`) holds this username
    async fn username_taken(&self, username: &UserName, except: Option<&UserId>)
    -> AuthResult<bool>;

    /// True if another user (not `except`) holds this email
    async fn email_taken(&self, email: &Email, except: Option<&UserId>) -> AuthResult<bool>;

    /// Persist username, email, password and `updated_at`
    async fn update(&self, user: &User) -> AuthResult<()>;

    /// Delete a user. Returns false if nothing was deleted.
    async fn delete(&self, id: &UserId) -> AuthResult<bool>;
}

/// Content carrying a denormalized copy of its author's username.
///
/// Implemented by the post store so renames propagate without this crate
/// depending on it.
#[trait_variant::make(AuthoredContent: Send)]
pub trait LocalAuthoredContent {
    /// Rewrite the username on everything `author` owns. Returns rows touched.
    async fn rename_author(&self, author: &UserId, username: &UserName) -> AuthResult<u64>;
}
