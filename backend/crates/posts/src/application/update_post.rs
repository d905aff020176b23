//! Update Post Use Case
//!
//! Author-only. The slug is recomputed only when the title actually
//! changes.

use std::sync::Arc;

use auth::models::user_id::UserId;

use crate::application::create_post::collect;
use crate::application::parse_post_id;
use crate::domain::entity::post::Post;
use crate::domain::repository::PostRepository;
use crate::domain::services::allocate_slug;
use crate::domain::value_object::{content::Content, image_url::ImageUrl, title::Title};
use crate::error::{PostError, PostResult};

/// Absent fields are left unchanged; `image_url: Some("")` clears the image.
pub struct UpdatePostInput {
    pub id: String,
    pub requester: UserId,
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub content: Option<String>,
}

pub struct UpdatePostUseCase<R>
where
    R: PostRepository,
{
    repo: Arc<R>,
}

impl<R> UpdatePostUseCase<R>
where
    R: PostRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: UpdatePostInput) -> PostResult<Post> {
        let mut errors = Vec::new();
        let content = input
            .content
            .as_deref()
            .map(Content::new)
            .transpose()
            .map_err(|e| collect(&mut errors, e));
        let image_url = input
            .image_url
            .as_deref()
            .map(ImageUrl::parse)
            .transpose()
            .map_err(|e| collect(&mut errors, e));
        let title = input
            .title
            .as_deref()
            .map(Title::new)
            .transpose()
            .map_err(|e| collect(&mut errors, e));

        let (Ok(title), Ok(image_url), Ok(content)) = (title, image_url, content) else {
            return Err(PostError::ValidationFailed(errors));
        };

        let id = parse_post_id(&input.id)?;
        let mut post = self.repo.find_by_id(&id).await?.ok_or(PostError::NotFound)?;
        if !post.is_authored_by(&input.requester) {
            return Err(PostError::Forbidden { action: "update" });
        }

        if let Some(title) = title {
            if title != post.title {
                let slug = allocate_slug(self.repo.as_ref(), title.as_str(), Some(&post.id)).await?;
                post.retitle(title, slug);
            }
        }
        if let Some(image_url) = image_url {
            post.set_image_url(image_url);
        }
        if let Some(content) = content {
            post.set_content(content);
        }
        post.touch();

        self.repo.update(&post).await?;

        tracing::info!(post_id = %post.id, slug = %post.slug, "Post updated");

        Ok(post)
    }
}
