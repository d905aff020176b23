//! Posts Backend Module
//!
//! Same layering as the auth crate:
//! - `domain/` - Post entity, value objects, repository trait, slug service
//! - `application/` - Use cases
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Unique, human-readable slugs derived from titles
//! - Author-only updates and deletes
//! - Paginated, sortable, searchable listings and site stats
//! - Username fan-out on profile rename via [`auth::AuthoredContent`]

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use domain::repository::PostRepository;
pub use error::{PostError, PostResult};
pub use infra::{InMemoryPostRepository, PgPostRepository};
pub use presentation::router::posts_router;
