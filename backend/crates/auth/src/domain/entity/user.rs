//! User Entity
//!
//! An account: identity plus credentials. The password is held only as a
//! hash and is never serialized.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    email::Email, user_id::UserId, user_name::UserName, user_password::UserPassword,
};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// 24-hex identifier, embedded in tokens as `sub`
    pub id: UserId,
    /// Unique, case-preserving handle
    pub username: UserName,
    /// Unique, lowercased
    pub email: Email,
    pub password: UserPassword,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user
    pub fn new(username: UserName, email: Email, password: UserPassword) -> Self {
        let now = Utc::now();

        Self {
            id: UserId::new(),
            username,
            email,
            password,
            created_at: now,
            updated_at: now,
        }
    }

    /// Update user name
    pub fn rename(&mut self, username: UserName) {
        self.username = username;
        self.touch();
    }

    pub fn set_email(&mut self, email: Email) {
        self.email = email;
        self.touch();
    }

    pub fn set_password(&mut self, password: UserPassword) {
        self.password = password;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
