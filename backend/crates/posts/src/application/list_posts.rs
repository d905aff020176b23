//! List Posts Use Case
//!
//! One page of posts plus the pagination descriptor.

use std::sync::Arc;

use crate::domain::entity::post::Post;
use crate::domain::repository::{PostQuery, PostRepository};
use crate::error::PostResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u64,
    pub total_posts: u64,
    pub limit: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = total.div_ceil(u64::from(limit.max(1)));
        Self {
            current_page: page,
            total_pages,
            total_posts: total,
            limit,
            has_next_page: u64::from(page) < total_pages,
            has_prev_page: page > 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub pagination: Pagination,
}

pub struct ListPostsUseCase<R>
where
    R: PostRepository,
{
    repo: Arc<R>,
}

impl<R> ListPostsUseCase<R>
where
    R: PostRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, query: PostQuery) -> PostResult<PostPage> {
        let (posts, total) = self.repo.list(&query).await?;
        Ok(PostPage {
            posts,
            pagination: Pagination::new(query.page, query.limit, total),
        })
    }
}
