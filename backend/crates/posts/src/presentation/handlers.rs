//! HTTP Handlers

use auth::middleware::{CurrentUser, Viewer};
use axum::extract::State;
use kernel::extract::{CleanPath, ValidatedJson, ValidatedQuery};
use kernel::response::ApiResponse;
use std::sync::Arc;

use crate::application::{
    CreatePostInput, CreatePostUseCase, DeletePostInput, DeletePostUseCase, GetPostUseCase,
    ListPostsUseCase, StatsUseCase, UpdatePostInput, UpdatePostUseCase,
};
use crate::domain::repository::{PostFilter, PostRepository};
use crate::error::PostResult;
use crate::presentation::dto::{
    CreatePostRequest, DeletedResponse, ListPostsQuery, PostListResponse, PostResponse,
    StatsResponse, UpdatePostRequest,
};

/// Shared state for post handlers
pub struct PostsAppState<P> {
    pub posts: Arc<P>,
}

impl<P> Clone for PostsAppState<P> {
    fn clone(&self) -> Self {
        Self {
            posts: self.posts.clone(),
        }
    }
}

// ============================================================================
// Reads
// ============================================================================

/// GET /api/posts
pub async fn list<P>(
    State(state): State<PostsAppState<P>>,
    ValidatedQuery(query): ValidatedQuery<ListPostsQuery>,
) -> PostResult<ApiResponse<PostListResponse>>
where
    P: PostRepository + Send + Sync + 'static,
{
    let page = ListPostsUseCase::new(state.posts.clone())
        .execute(query.search())
        .await?;
    Ok(ApiResponse::ok((&page).into()))
}

/// GET /api/posts/stats
pub async fn stats<P>(State(state): State<PostsAppState<P>>) -> PostResult<ApiResponse<StatsResponse>>
where
    P: PostRepository + Send + Sync + 'static,
{
    let stats = StatsUseCase::new(state.posts.clone()).execute().await?;
    Ok(ApiResponse::ok((&stats).into()))
}

/// GET /api/posts/my-posts
pub async fn my_posts<P>(
    State(state): State<PostsAppState<P>>,
    current: CurrentUser,
    ValidatedQuery(query): ValidatedQuery<ListPostsQuery>,
) -> PostResult<ApiResponse<PostListResponse>>
where
    P: PostRepository + Send + Sync + 'static,
{
    let page = ListPostsUseCase::new(state.posts.clone())
        .execute(query.paged(PostFilter::Author(*current.id())))
        .await?;
    Ok(ApiResponse::ok((&page).into()))
}

/// GET /api/posts/user/{username}
pub async fn by_username<P>(
    State(state): State<PostsAppState<P>>,
    CleanPath(username): CleanPath,
    ValidatedQuery(query): ValidatedQuery<ListPostsQuery>,
) -> PostResult<ApiResponse<PostListResponse>>
where
    P: PostRepository + Send + Sync + 'static,
{
    let page = ListPostsUseCase::new(state.posts.clone())
        .execute(query.paged(PostFilter::Username(username)))
        .await?;
    Ok(ApiResponse::ok((&page).into()))
}

/// GET /api/posts/{slug_or_id}
pub async fn get_post<P>(
    State(state): State<PostsAppState<P>>,
    viewer: Viewer,
    CleanPath(key): CleanPath,
) -> PostResult<ApiResponse<PostResponse>>
where
    P: PostRepository + Send + Sync + 'static,
{
    let post = GetPostUseCase::new(state.posts.clone()).execute(&key).await?;
    tracing::debug!(
        post_id = %post.id,
        authenticated = viewer.is_authenticated(),
        "Post fetched"
    );
    Ok(ApiResponse::ok(PostResponse { post: (&post).into() }))
}

// ============================================================================
// Writes
// ============================================================================

/// POST /api/posts
pub async fn create<P>(
    State(state): State<PostsAppState<P>>,
    current: CurrentUser,
    ValidatedJson(req): ValidatedJson<CreatePostRequest>,
) -> PostResult<ApiResponse<PostResponse>>
where
    P: PostRepository + Send + Sync + 'static,
{
    let author = current.user();
    let post = CreatePostUseCase::new(state.posts.clone())
        .execute(CreatePostInput {
            author: author.id,
            username: author.username.clone(),
            title: req.title.unwrap_or_default(),
            image_url: req.imageURL,
            content: req.content.unwrap_or_default(),
        })
        .await?;

    Ok(ApiResponse::created(PostResponse { post: (&post).into() })
        .with_message("Post created successfully"))
}

/// PUT | PATCH /api/posts/{id}
pub async fn update<P>(
    State(state): State<PostsAppState<P>>,
    current: CurrentUser,
    CleanPath(id): CleanPath,
    ValidatedJson(req): ValidatedJson<UpdatePostRequest>,
) -> PostResult<ApiResponse<PostResponse>>
where
    P: PostRepository + Send + Sync + 'static,
{
    let post = UpdatePostUseCase::new(state.posts.clone())
        .execute(UpdatePostInput {
            id,
            requester: *current.id(),
            title: req.title,
            image_url: req.imageURL,
            content: req.content,
        })
        .await?;

    Ok(ApiResponse::ok(PostResponse { post: (&post).into() })
        .with_message("Post updated successfully"))
}

/// DELETE /api/posts/{id}
pub async fn delete<P>(
    State(state): State<PostsAppState<P>>,
    current: CurrentUser,
    CleanPath(id): CleanPath,
) -> PostResult<ApiResponse<DeletedResponse>>
where
    P: PostRepository + Send + Sync + 'static,
{
    let id = DeletePostUseCase::new(state.posts.clone())
        .execute(DeletePostInput {
            id,
            requester: *current.id(),
        })
        .await?;

    Ok(ApiResponse::ok(DeletedResponse { id: id.to_string() })
        .with_message("Post deleted successfully"))
}
