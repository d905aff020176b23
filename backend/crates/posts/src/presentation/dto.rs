//! API DTOs (Data Transfer Objects)
//!
//! Request fields carry their wire names so validation failures are
//! reported against them.

#![allow(non_snake_case)]

use chrono::{DateTime, Utc};
use kernel::validation::{is_absolute_url, rule_error, trimmed};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::application::{Pagination, PostPage};
use crate::domain::entity::post::Post;
use crate::domain::repository::{PostFilter, PostQuery, PostStats, RecentPost, SortField, SortOrder};

// ============================================================================
// Rules
// ============================================================================

fn image_url_rule(value: &str) -> Result<(), ValidationError> {
    // Blank counts as absent
    if value.is_empty() || is_absolute_url(value) {
        Ok(())
    } else {
        Err(rule_error("url", "Please provide a valid URL"))
    }
}

fn page_rule(value: &str) -> Result<(), ValidationError> {
    match value.parse::<u32>() {
        Ok(page) if page >= 1 => Ok(()),
        _ => Err(rule_error("page", "Page must be a positive integer")),
    }
}

fn limit_rule(value: &str) -> Result<(), ValidationError> {
    match value.parse::<u32>() {
        Ok(limit) if (1..=PostQuery::MAX_LIMIT).contains(&limit) => Ok(()),
        _ => Err(rule_error("limit", "Limit must be between 1 and 50")),
    }
}

fn sort_field(value: &str) -> Option<SortField> {
    match value {
        "createdAt" => Some(SortField::CreatedAt),
        "title" => Some(SortField::Title),
        "updatedAt" => Some(SortField::UpdatedAt),
        _ => None,
    }
}

fn sort_by_rule(value: &str) -> Result<(), ValidationError> {
    sort_field(value)
        .map(|_| ())
        .ok_or_else(|| rule_error("sort_by", "Invalid sort field"))
}

fn sort_order(value: &str) -> Option<SortOrder> {
    match value {
        "asc" => Some(SortOrder::Asc),
        "desc" => Some(SortOrder::Desc),
        _ => None,
    }
}

fn order_rule(value: &str) -> Result<(), ValidationError> {
    sort_order(value)
        .map(|_| ())
        .ok_or_else(|| rule_error("order", "Order must be asc or desc"))
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(
        required(message = "Title must be 5-120 characters"),
        length(min = 5, max = 120, message = "Title must be 5-120 characters")
    )]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "trimmed")]
    #[validate(custom(function = image_url_rule))]
    pub imageURL: Option<String>,

    #[serde(default, deserialize_with = "trimmed")]
    #[validate(
        required(message = "Content must be at least 50 characters"),
        length(min = 50, message = "Content must be at least 50 characters")
    )]
    pub content: Option<String>,
}

/// Every field optional; `imageURL: ""` clears the image.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 5, max = 120, message = "Title must be 5-120 characters"))]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "trimmed")]
    #[validate(custom(function = image_url_rule))]
    pub imageURL: Option<String>,

    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 50, message = "Content must be at least 50 characters"))]
    pub content: Option<String>,
}

/// Listing query string. Values arrive as strings and are checked here.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListPostsQuery {
    #[serde(default)]
    #[validate(custom(function = page_rule))]
    pub page: Option<String>,

    #[serde(default)]
    #[validate(custom(function = limit_rule))]
    pub limit: Option<String>,

    #[serde(default)]
    #[validate(custom(function = sort_by_rule))]
    pub sortBy: Option<String>,

    #[serde(default)]
    #[validate(custom(function = order_rule))]
    pub order: Option<String>,

    #[serde(default, deserialize_with = "trimmed")]
    pub search: Option<String>,
}

impl ListPostsQuery {
    /// Paging only; sort stays at newest first.
    pub fn paged(&self, filter: PostFilter) -> PostQuery {
        PostQuery {
            page: self
                .page
                .as_deref()
                .and_then(|p| p.parse().ok())
                .unwrap_or(PostQuery::DEFAULT_PAGE),
            limit: self
                .limit
                .as_deref()
                .and_then(|l| l.parse().ok())
                .unwrap_or(PostQuery::DEFAULT_LIMIT),
            ..PostQuery::new(filter)
        }
    }

    /// The public listing: paging, sort and search.
    pub fn search(&self) -> PostQuery {
        let term = self.search.clone().filter(|s| !s.is_empty());
        PostQuery {
            sort: self
                .sortBy
                .as_deref()
                .and_then(sort_field)
                .unwrap_or_default(),
            order: self.order.as_deref().and_then(sort_order).unwrap_or_default(),
            ..self.paged(PostFilter::Search(term))
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(rename = "imageURL", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub content: String,
    pub username: String,
    /// Owning user's id
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Post> for PostView {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.to_string(),
            title: post.title.to_string(),
            slug: post.slug.to_string(),
            image_url: post.image_url.as_ref().map(|u| u.as_str().to_string()),
            content: post.content.as_str().to_string(),
            username: post.username.to_string(),
            author: post.author.to_string(),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostResponse {
    pub post: PostView,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationView {
    pub current_page: u32,
    pub total_pages: u64,
    pub total_posts: u64,
    pub limit: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl From<&Pagination> for PaginationView {
    fn from(p: &Pagination) -> Self {
        Self {
            current_page: p.current_page,
            total_pages: p.total_pages,
            total_posts: p.total_posts,
            limit: p.limit,
            has_next_page: p.has_next_page,
            has_prev_page: p.has_prev_page,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostListResponse {
    pub posts: Vec<PostView>,
    pub pagination: PaginationView,
}

impl From<&PostPage> for PostListResponse {
    fn from(page: &PostPage) -> Self {
        Self {
            posts: page.posts.iter().map(PostView::from).collect(),
            pagination: (&page.pagination).into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeletedResponse {
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentPostView {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<&RecentPost> for RecentPostView {
    fn from(p: &RecentPost) -> Self {
        Self {
            id: p.id.to_string(),
            title: p.title.clone(),
            slug: p.slug.clone(),
            username: p.username.clone(),
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_posts: u64,
    pub total_users: u64,
    pub recent_posts: Vec<RecentPostView>,
}

impl From<&PostStats> for StatsResponse {
    fn from(s: &PostStats) -> Self {
        Self {
            total_posts: s.total_posts,
            total_users: s.total_users,
            recent_posts: s.recent_posts.iter().map(RecentPostView::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::validation::validate;
    use serde_json::json;

    fn fields<T: Validate>(input: &T) -> Vec<(String, String)> {
        match validate(input) {
            Ok(()) => Vec::new(),
            Err(e) => e
                .details()
                .iter()
                .map(|d| (d.field.to_string(), d.message.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_create_rules() {
        let req: CreatePostRequest = serde_json::from_value(json!({
            "title": "  abc  ",
            "imageURL": "nope",
            "content": "short"
        }))
        .unwrap();
        assert_eq!(
            fields(&req),
            vec![
                ("content".into(), "Content must be at least 50 characters".into()),
                ("imageURL".into(), "Please provide a valid URL".into()),
                ("title".into(), "Title must be 5-120 characters".into()),
            ]
        );
    }

    #[test]
    fn test_blank_image_url_is_absent() {
        let req: CreatePostRequest = serde_json::from_value(json!({
            "title": "Hello World",
            "imageURL": "",
            "content": "x".repeat(60)
        }))
        .unwrap();
        assert!(fields(&req).is_empty());
    }

    #[test]
    fn test_list_query_rules() {
        let q: ListPostsQuery = serde_json::from_value(json!({
            "page": "0",
            "limit": "51",
            "sortBy": "author",
            "order": "up"
        }))
        .unwrap();
        assert_eq!(
            fields(&q),
            vec![
                ("limit".into(), "Limit must be between 1 and 50".into()),
                ("order".into(), "Order must be asc or desc".into()),
                ("page".into(), "Page must be a positive integer".into()),
                ("sortBy".into(), "Invalid sort field".into()),
            ]
        );
    }

    #[test]
    fn test_list_query_defaults_and_parsing() {
        let q = ListPostsQuery::default().search();
        assert_eq!(q, PostQuery::new(PostFilter::Search(None)));

        let q: ListPostsQuery = serde_json::from_value(json!({
            "page": "2",
            "limit": "5",
            "sortBy": "title",
            "order": "asc",
            "search": "  rust  "
        }))
        .unwrap();
        let query = q.search();
        assert_eq!((query.page, query.limit), (2, 5));
        assert_eq!((query.sort, query.order), (SortField::Title, SortOrder::Asc));
        assert_eq!(query.filter, PostFilter::Search(Some("rust".into())));
    }

    #[test]
    fn test_paged_keeps_fixed_sort() {
        let q: ListPostsQuery =
            serde_json::from_value(json!({"sortBy": "title", "order": "asc"})).unwrap();
        let query = q.paged(PostFilter::Username("alice".into()));
        assert_eq!((query.sort, query.order), (SortField::CreatedAt, SortOrder::Desc));
    }
}
