//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router, gate middleware
//!
//! ## Features
//! - Registration and login by email or username
//! - Stateless HS256 bearer tokens (no server-side sessions)
//! - Profile update with username fan-out to authored content
//! - Password change and account deletion
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optional pepper
//! - Password hashes never serialized
//! - Gate failures distinguish missing, invalid and expired tokens and
//!   deleted users

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use domain::repository::{AuthoredContent, UserRepository};
pub use error::{AuthError, AuthResult};
pub use infra::{InMemoryAuthRepository, PgAuthRepository};
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
