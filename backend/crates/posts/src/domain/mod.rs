//! Domain Layer
//!
//! Contains entities, value objects, repository traits and the slug service.

pub mod entity;
pub mod repository;
pub mod services;
pub mod value_object;

// Re-exports
pub use entity::post::Post;
pub use repository::{PostFilter, PostQuery, PostRepository, PostStats, SortField, SortOrder};
