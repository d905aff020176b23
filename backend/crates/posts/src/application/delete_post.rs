//! Delete Post Use Case

use std::sync::Arc;

use auth::models::user_id::UserId;

use crate::application::parse_post_id;
use crate::domain::repository::PostRepository;
use crate::domain::value_object::post_id::PostId;
use crate::error::{PostError, PostResult};

pub struct DeletePostInput {
    pub id: String,
    pub requester: UserId,
}

pub struct DeletePostUseCase<R>
where
    R: PostRepository,
{
    repo: Arc<R>,
}

impl<R> DeletePostUseCase<R>
where
    R: PostRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Returns the id of the deleted post.
    pub async fn execute(&self, input: DeletePostInput) -> PostResult<PostId> {
        let id = parse_post_id(&input.id)?;

        let post = self.repo.find_by_id(&id).await?.ok_or(PostError::NotFound)?;
        if !post.is_authored_by(&input.requester) {
            return Err(PostError::Forbidden { action: "delete" });
        }

        // Gone between lookup and delete: someone else removed it
        if !self.repo.delete(&id).await? {
            return Err(PostError::NotFound);
        }

        tracing::info!(post_id = %id, "Post deleted");

        Ok(id)
    }
}
