//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::db::{DbFailure, classify};
use sqlx::PgPool;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email, user_id::UserId, user_name::UserName, user_password::UserPassword,
};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Unique violations on write become `DuplicateKey` for the offending field.
fn write_error(e: sqlx::Error) -> AuthError {
    match classify(&e) {
        DbFailure::UniqueViolation { field } => AuthError::DuplicateKey { field },
        _ => AuthError::Database(e),
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id,
                username,
                email,
                password_hash,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id.to_string())
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(user.password.as_phc_string())
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(write_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_login(&self, login: &str) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users
            WHERE email = lower($1) OR username = $1
            LIMIT 1
            "#,
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn username_taken(
        &self,
        username: &UserName,
        except: Option<&UserId>,
    ) -> AuthResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM users
                WHERE username = $1 AND ($2::text IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(username.as_str())
        .bind(except.map(|id| id.to_string()))
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn email_taken(&self, email: &Email, except: Option<&UserId>) -> AuthResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM users
                WHERE email = $1 AND ($2::text IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(email.as_str())
        .bind(except.map(|id| id.to_string()))
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET username = $2, email = $3, password_hash = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(user.id.to_string())
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(user.password.as_phc_string())
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(write_error)?;

        Ok(())
    }

    async fn delete(&self, id: &UserId) -> AuthResult<bool> {
        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    username: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let id = self
            .id
            .trim()
            .parse::<UserId>()
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(User {
            id,
            username: UserName::from_db(self.username),
            email: Email::from_db(self.email),
            password: UserPassword::from_phc_string(self.password_hash)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
