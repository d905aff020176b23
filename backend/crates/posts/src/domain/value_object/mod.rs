//! Value Object Module

pub mod content;
pub mod image_url;
pub mod post_id;
pub mod slug;
pub mod title;
