//! Domain Entities

pub mod post;

pub use post::Post;
