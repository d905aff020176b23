//! In-memory Repository
//!
//! Process-local post store for development without a database and for
//! tests. Slug uniqueness is enforced under the lock, like the unique index
//! in PostgreSQL.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use auth::models::{user_id::UserId, user_name::UserName};
use auth::{AuthError, AuthResult, AuthoredContent};
use chrono::Utc;

use crate::domain::entity::post::Post;
use crate::domain::repository::{
    PostFilter, PostQuery, PostRepository, PostStats, RecentPost, SortField, SortOrder,
};
use crate::domain::value_object::{post_id::PostId, slug::Slug};
use crate::error::{PostError, PostResult};

#[derive(Debug, Default)]
pub struct InMemoryPostRepository {
    posts: Mutex<HashMap<PostId, Post>>,
}

type Posts = HashMap<PostId, Post>;

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> PostResult<MutexGuard<'_, Posts>> {
        self.posts
            .lock()
            .map_err(|_| PostError::Internal("post store poisoned".to_string()))
    }

    fn slug_taken(posts: &Posts, post: &Post) -> bool {
        posts
            .values()
            .any(|p| p.slug == post.slug && p.id != post.id)
    }
}

fn matches(filter: &PostFilter, post: &Post) -> bool {
    match filter {
        PostFilter::Search(None) => true,
        PostFilter::Search(Some(term)) => {
            let term = term.to_lowercase();
            post.title.as_str().to_lowercase().contains(&term)
                || post.username.as_str().to_lowercase().contains(&term)
        }
        PostFilter::Author(id) => &post.author == id,
        PostFilter::Username(name) => post.username.as_str() == name,
    }
}

fn compare(sort: SortField, a: &Post, b: &Post) -> Ordering {
    let key = match sort {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::Title => a.title.as_str().cmp(b.title.as_str()),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    };
    key.then_with(|| a.id.cmp(&b.id))
}

impl PostRepository for InMemoryPostRepository {
    async fn create(&self, post: &Post) -> PostResult<()> {
        let mut posts = self.lock()?;
        if Self::slug_taken(&posts, post) {
            return Err(PostError::DuplicateKey {
                field: "slug".to_string(),
            });
        }
        posts.insert(post.id, post.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &PostId) -> PostResult<Option<Post>> {
        Ok(self.lock()?.get(id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> PostResult<Option<Post>> {
        Ok(self
            .lock()?
            .values()
            .find(|p| p.slug.as_str() == slug)
            .cloned())
    }

    async fn slug_exists(&self, slug: &Slug, except: Option<&PostId>) -> PostResult<bool> {
        Ok(self
            .lock()?
            .values()
            .any(|p| &p.slug == slug && Some(&p.id) != except))
    }

    async fn update(&self, post: &Post) -> PostResult<()> {
        let mut posts = self.lock()?;
        if !posts.contains_key(&post.id) {
            return Err(PostError::NotFound);
        }
        if Self::slug_taken(&posts, post) {
            return Err(PostError::DuplicateKey {
                field: "slug".to_string(),
            });
        }
        posts.insert(post.id, post.clone());
        Ok(())
    }

    async fn delete(&self, id: &PostId) -> PostResult<bool> {
        Ok(self.lock()?.remove(id).is_some())
    }

    async fn list(&self, query: &PostQuery) -> PostResult<(Vec<Post>, u64)> {
        let posts = self.lock()?;
        let mut found: Vec<&Post> = posts
            .values()
            .filter(|p| matches(&query.filter, p))
            .collect();

        found.sort_by(|a, b| match query.order {
            SortOrder::Asc => compare(query.sort, a, b),
            SortOrder::Desc => compare(query.sort, b, a),
        });

        let total = found.len() as u64;
        let page = found
            .into_iter()
            .skip(usize::try_from(query.offset()).unwrap_or(usize::MAX))
            .take(query.limit as usize)
            .cloned()
            .collect();

        Ok((page, total))
    }

    async fn stats(&self) -> PostResult<PostStats> {
        let posts = self.lock()?;
        let authors: HashSet<&UserId> = posts.values().map(|p| &p.author).collect();

        let mut recent: Vec<&Post> = posts.values().collect();
        recent.sort_by(|a, b| compare(SortField::CreatedAt, b, a));

        Ok(PostStats {
            total_posts: posts.len() as u64,
            total_users: authors.len() as u64,
            recent_posts: recent
                .into_iter()
                .take(PostStats::RECENT)
                .map(|p| RecentPost {
                    id: p.id,
                    title: p.title.to_string(),
                    slug: p.slug.to_string(),
                    username: p.username.to_string(),
                    created_at: p.created_at,
                })
                .collect(),
        })
    }
}

impl AuthoredContent for InMemoryPostRepository {
    async fn rename_author(&self, author: &UserId, username: &UserName) -> AuthResult<u64> {
        let mut posts = self
            .posts
            .lock()
            .map_err(|_| AuthError::Internal("post store poisoned".to_string()))?;

        let now = Utc::now();
        let mut touched = 0;
        for post in posts.values_mut().filter(|p| &p.author == author) {
            post.username = username.clone();
            post.updated_at = now;
            touched += 1;
        }
        Ok(touched)
    }
}
