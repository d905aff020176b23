//! Create Post Use Case

use std::sync::Arc;

use auth::models::{user_id::UserId, user_name::UserName};

use crate::domain::entity::post::Post;
use crate::domain::repository::PostRepository;
use crate::domain::services::allocate_slug;
use crate::domain::value_object::{content::Content, image_url::ImageUrl, title::Title};
use crate::error::{PostError, PostResult};

pub struct CreatePostInput {
    pub author: UserId,
    pub username: UserName,
    pub title: String,
    /// Blank means no image
    pub image_url: Option<String>,
    pub content: String,
}

pub struct CreatePostUseCase<R>
where
    R: PostRepository,
{
    repo: Arc<R>,
}

impl<R> CreatePostUseCase<R>
where
    R: PostRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: CreatePostInput) -> PostResult<Post> {
        let mut errors = Vec::new();
        let content = Content::new(&input.content).map_err(|e| collect(&mut errors, e));
        let image_url = input
            .image_url
            .as_deref()
            .map(ImageUrl::parse)
            .transpose()
            .map_err(|e| collect(&mut errors, e));
        let title = Title::new(&input.title).map_err(|e| collect(&mut errors, e));

        let (Ok(title), Ok(image_url), Ok(content)) = (title, image_url, content) else {
            return Err(PostError::ValidationFailed(errors));
        };

        let slug = allocate_slug(self.repo.as_ref(), title.as_str(), None).await?;
        let post = Post::new(
            title,
            slug,
            image_url.flatten(),
            content,
            input.author,
            input.username,
        );

        self.repo.create(&post).await?;

        tracing::info!(post_id = %post.id, slug = %post.slug, author = %post.author, "Post created");

        Ok(post)
    }
}

/// Gather field errors so every invalid field is reported at once.
pub(crate) fn collect(errors: &mut Vec<kernel::error::app_error::FieldError>, err: PostError) {
    if let PostError::ValidationFailed(mut details) = err {
        errors.append(&mut details);
    }
}
