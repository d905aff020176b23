//! Application Layer
//!
//! Use cases over the post store.

pub mod create_post;
pub mod delete_post;
pub mod get_post;
pub mod list_posts;
pub mod stats;
pub mod update_post;

// Re-exports
pub use create_post::{CreatePostInput, CreatePostUseCase};
pub use delete_post::{DeletePostInput, DeletePostUseCase};
pub use get_post::GetPostUseCase;
pub use list_posts::{ListPostsUseCase, Pagination, PostPage};
pub use stats::StatsUseCase;
pub use update_post::{UpdatePostInput, UpdatePostUseCase};

use crate::domain::value_object::post_id::PostId;
use crate::error::{PostError, PostResult};

/// Parse a path value that must be a post id.
pub(crate) fn parse_post_id(raw: &str) -> PostResult<PostId> {
    raw.parse()
        .map_err(|_| PostError::InvalidId(raw.to_string()))
}
