//! PostgreSQL Repository Implementation

use auth::models::{user_id::UserId, user_name::UserName};
use auth::{AuthResult, AuthoredContent};
use chrono::{DateTime, Utc};
use kernel::db::{DbFailure, classify};
use sqlx::PgPool;

use crate::domain::entity::post::Post;
use crate::domain::repository::{
    PostFilter, PostQuery, PostRepository, PostStats, RecentPost, SortField, SortOrder,
};
use crate::domain::value_object::{
    content::Content, image_url::ImageUrl, post_id::PostId, slug::Slug, title::Title,
};
use crate::error::{PostError, PostResult};

const POST_COLUMNS: &str =
    "id, title, slug, image_url, content, username, author_id, created_at, updated_at";

/// PostgreSQL-backed post repository
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn write_error(e: sqlx::Error) -> PostError {
    match classify(&e) {
        DbFailure::UniqueViolation { field } => PostError::DuplicateKey { field },
        _ => PostError::Database(e),
    }
}

/// `%term%` for ILIKE with the pattern metacharacters escaped.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn order_by(sort: SortField, order: SortOrder) -> String {
    let column = match sort {
        SortField::CreatedAt => "created_at",
        SortField::Title => "title",
        SortField::UpdatedAt => "updated_at",
    };
    let direction = match order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    };
    format!("{column} {direction}, id {direction}")
}

/// Bind values for the shared WHERE clause: (search, author, username).
fn filter_binds(filter: &PostFilter) -> (Option<String>, Option<String>, Option<String>) {
    match filter {
        PostFilter::Search(term) => (term.as_deref().map(like_pattern), None, None),
        PostFilter::Author(id) => (None, Some(id.to_string()), None),
        PostFilter::Username(name) => (None, None, Some(name.clone())),
    }
}

const FILTER_CLAUSE: &str = r#"
    ($1::text IS NULL OR title ILIKE $1 OR username ILIKE $1)
    AND ($2::text IS NULL OR author_id = $2)
    AND ($3::text IS NULL OR username = $3)
"#;

impl PostRepository for PgPostRepository {
    async fn create(&self, post: &Post) -> PostResult<()> {
        sqlx::query(
            r#"
            INSERT INTO posts (
                id,
                title,
                slug,
                image_url,
                content,
                username,
                author_id,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(post.id.to_string())
        .bind(post.title.as_str())
        .bind(post.slug.as_str())
        .bind(post.image_url.as_ref().map(|u| u.as_str()))
        .bind(post.content.as_str())
        .bind(post.username.as_str())
        .bind(post.author.to_string())
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(write_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &PostId) -> PostResult<Option<Post>> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_post()).transpose()
    }

    async fn find_by_slug(&self, slug: &str) -> PostResult<Option<Post>> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_post()).transpose()
    }

    async fn slug_exists(&self, slug: &Slug, except: Option<&PostId>) -> PostResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM posts
                WHERE slug = $1 AND ($2::text IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(slug.as_str())
        .bind(except.map(|id| id.to_string()))
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn update(&self, post: &Post) -> PostResult<()> {
        sqlx::query(
            r#"
            UPDATE posts
            SET title = $2, slug = $3, image_url = $4, content = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(post.id.to_string())
        .bind(post.title.as_str())
        .bind(post.slug.as_str())
        .bind(post.image_url.as_ref().map(|u| u.as_str()))
        .bind(post.content.as_str())
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(write_error)?;

        Ok(())
    }

    async fn delete(&self, id: &PostId) -> PostResult<bool> {
        let deleted = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn list(&self, query: &PostQuery) -> PostResult<(Vec<Post>, u64)> {
        let (search, author, username) = filter_binds(&query.filter);

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM posts WHERE {FILTER_CLAUSE}"
        ))
        .bind(&search)
        .bind(&author)
        .bind(&username)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE {FILTER_CLAUSE} ORDER BY {} LIMIT $4 OFFSET $5",
            order_by(query.sort, query.order)
        ))
        .bind(&search)
        .bind(&author)
        .bind(&username)
        .bind(i64::from(query.limit))
        .bind(i64::try_from(query.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        let posts = rows
            .into_iter()
            .map(PostRow::into_post)
            .collect::<PostResult<Vec<_>>>()?;

        Ok((posts, u64::try_from(total).unwrap_or_default()))
    }

    async fn stats(&self) -> PostResult<PostStats> {
        let (total_posts, total_users): (i64, i64) =
            sqlx::query_as("SELECT COUNT(*), COUNT(DISTINCT author_id) FROM posts")
                .fetch_one(&self.pool)
                .await?;

        let recent = sqlx::query_as::<_, RecentRow>(
            r#"
            SELECT id, title, slug, username, created_at
            FROM posts
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(PostStats::RECENT as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(PostStats {
            total_posts: u64::try_from(total_posts).unwrap_or_default(),
            total_users: u64::try_from(total_users).unwrap_or_default(),
            recent_posts: recent
                .into_iter()
                .map(RecentRow::into_recent)
                .collect::<PostResult<Vec<_>>>()?,
        })
    }
}

impl AuthoredContent for PgPostRepository {
    async fn rename_author(&self, author: &UserId, username: &UserName) -> AuthResult<u64> {
        let touched = sqlx::query(
            "UPDATE posts SET username = $2, updated_at = now() WHERE author_id = $1",
        )
        .bind(author.to_string())
        .bind(username.as_str())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(touched)
    }
}

// ============================================================================
// Row Types
// ============================================================================

fn parse_id<T: std::str::FromStr<Err = kernel::id::IdParseError>>(raw: &str) -> PostResult<T> {
    raw.trim()
        .parse()
        .map_err(|e: kernel::id::IdParseError| PostError::Internal(e.to_string()))
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: String,
    title: String,
    slug: String,
    image_url: Option<String>,
    content: String,
    username: String,
    author_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PostRow {
    fn into_post(self) -> PostResult<Post> {
        Ok(Post {
            id: parse_id(&self.id)?,
            title: Title::from_db(self.title),
            slug: Slug::from_db(self.slug),
            image_url: self.image_url.map(ImageUrl::from_db),
            content: Content::from_db(self.content),
            username: UserName::from_db(self.username),
            author: parse_id(&self.author_id)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RecentRow {
    id: String,
    title: String,
    slug: String,
    username: String,
    created_at: DateTime<Utc>,
}

impl RecentRow {
    fn into_recent(self) -> PostResult<RecentPost> {
        Ok(RecentPost {
            id: parse_id(&self.id)?,
            title: self.title,
            slug: self.slug,
            username: self.username,
            created_at: self.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("rust"), "%rust%");
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }

    #[test]
    fn test_order_by_breaks_ties_by_id() {
        assert_eq!(
            order_by(SortField::Title, SortOrder::Asc),
            "title ASC, id ASC"
        );
        assert_eq!(
            order_by(SortField::CreatedAt, SortOrder::Desc),
            "created_at DESC, id DESC"
        );
    }
}
