//! Stats Use Case

use std::sync::Arc;

use crate::domain::repository::{PostRepository, PostStats};
use crate::error::PostResult;

pub struct StatsUseCase<R>
where
    R: PostRepository,
{
    repo: Arc<R>,
}

impl<R> StatsUseCase<R>
where
    R: PostRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self) -> PostResult<PostStats> {
        self.repo.stats().await
    }
}
