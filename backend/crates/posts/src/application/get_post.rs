//! Get Post Use Case
//!
//! Looks a post up by slug, falling back to id when the value is shaped
//! like one.

use std::sync::Arc;

use crate::domain::entity::post::Post;
use crate::domain::repository::PostRepository;
use crate::domain::value_object::post_id::PostId;
use crate::error::{PostError, PostResult};

pub struct GetPostUseCase<R>
where
    R: PostRepository,
{
    repo: Arc<R>,
}

impl<R> GetPostUseCase<R>
where
    R: PostRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, slug_or_id: &str) -> PostResult<Post> {
        if let Some(post) = self.repo.find_by_slug(slug_or_id).await? {
            return Ok(post);
        }

        if PostId::is_valid(slug_or_id) {
            if let Ok(id) = slug_or_id.parse::<PostId>() {
                if let Some(post) = self.repo.find_by_id(&id).await? {
                    return Ok(post);
                }
            }
        }

        Err(PostError::NotFound)
    }
}
