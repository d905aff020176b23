//! Post Entity

use auth::models::{user_id::UserId, user_name::UserName};
use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    content::Content, image_url::ImageUrl, post_id::PostId, slug::Slug, title::Title,
};

/// Post entity
///
/// `author` never changes after creation. `username` is a copy of the
/// author's name, re-synced when they rename.
#[derive(Debug, Clone)]
pub struct Post {
    pub id: PostId,
    pub title: Title,
    /// Unique across all posts
    pub slug: Slug,
    pub image_url: Option<ImageUrl>,
    pub content: Content,
    pub username: UserName,
    pub author: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(
        title: Title,
        slug: Slug,
        image_url: Option<ImageUrl>,
        content: Content,
        author: UserId,
        username: UserName,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: PostId::new(),
            title,
            slug,
            image_url,
            content,
            username,
            author,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_authored_by(&self, user: &UserId) -> bool {
        &self.author == user
    }

    /// Change the title together with the slug derived from it.
    pub fn retitle(&mut self, title: Title, slug: Slug) {
        self.title = title;
        self.slug = slug;
    }

    pub fn set_image_url(&mut self, image_url: Option<ImageUrl>) {
        self.image_url = image_url;
    }

    pub fn set_content(&mut self, content: Content) {
        self.content = content;
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
