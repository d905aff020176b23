//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use auth::models::user_id::UserId;
use chrono::{DateTime, Utc};

use crate::domain::entity::post::Post;
use crate::domain::value_object::{post_id::PostId, slug::Slug};
use crate::error::PostResult;

/// Which posts a listing covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    /// Everything, optionally narrowed by a case-insensitive substring of
    /// title or username
    Search(Option<String>),
    /// Posts owned by this author
    Author(UserId),
    /// Posts whose stored username equals this exactly
    Username(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    Title,
    UpdatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// A page request. `page` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    pub filter: PostFilter,
    pub sort: SortField,
    pub order: SortOrder,
    pub page: u32,
    pub limit: u32,
}

impl PostQuery {
    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_LIMIT: u32 = 10;
    pub const MAX_LIMIT: u32 = 50;

    pub fn new(filter: PostFilter) -> Self {
        Self {
            filter,
            sort: SortField::default(),
            order: SortOrder::default(),
            page: Self::DEFAULT_PAGE,
            limit: Self::DEFAULT_LIMIT,
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Projection of a post for the stats endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentPost {
    pub id: PostId,
    pub title: String,
    pub slug: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostStats {
    pub total_posts: u64,
    /// Distinct authors with at least one post
    pub total_users: u64,
    /// Newest first, at most [`PostStats::RECENT`]
    pub recent_posts: Vec<RecentPost>,
}

impl PostStats {
    pub const RECENT: usize = 5;
}

/// Post repository trait
///
/// `create` and `update` fail with `PostError::DuplicateKey { field: "slug" }`
/// when another post already holds the slug.
#[trait_variant::make(PostRepository: Send)]
pub trait LocalPostRepository {
    async fn create(&self, post: &Post) -> PostResult<()>;

    async fn find_by_id(&self, id: &PostId) -> PostResult<Option<Post>>;

    async fn find_by_slug(&self, slug: &str) -> PostResult<Option<Post>>;

    /// True if a post other than `except` holds this slug
    async fn slug_exists(&self, slug: &Slug, except: Option<&PostId>) -> PostResult<bool>;

    /// Persist every mutable field and `updated_at`
    async fn update(&self, post: &Post) -> PostResult<()>;

    /// Delete a post. Returns false if nothing was deleted.
    async fn delete(&self, id: &PostId) -> PostResult<bool>;

    /// One page of matching posts plus the total match count.
    /// Ties in the sort key are broken by id in the same direction.
    async fn list(&self, query: &PostQuery) -> PostResult<(Vec<Post>, u64)>;

    async fn stats(&self) -> PostResult<PostStats>;
}
