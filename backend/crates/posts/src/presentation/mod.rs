//! Presentation Layer
//!
//! HTTP handlers, DTOs and routing for `/api/posts`.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::PostsAppState;
pub use router::posts_router;
