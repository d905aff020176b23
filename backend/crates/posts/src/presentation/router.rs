//! Posts Router

use auth::UserRepository;
use auth::middleware::{AuthGate, optional_auth, require_auth};
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post, put},
};
use platform::rate_limit::{RateLimitStore, RateLimiter, enforce_rate_limit};
use std::sync::Arc;

use crate::domain::repository::PostRepository;
use crate::presentation::handlers::{self, PostsAppState};

/// Create the Posts router
///
/// `limiter` guards the public listing only. Single-post reads resolve the
/// caller when a token is present; writes require one.
pub fn posts_router<P, U, S>(posts: Arc<P>, gate: AuthGate<U>, limiter: RateLimiter<S>) -> Router
where
    P: PostRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    S: RateLimitStore + Send + Sync + 'static,
{
    let required = from_fn_with_state(gate.clone(), require_auth::<U>);
    let optional = from_fn_with_state(gate, optional_auth::<U>);
    let limited = from_fn_with_state(limiter, enforce_rate_limit::<S>);

    let collection = get(handlers::list::<P>)
        .route_layer(limited)
        .merge(post(handlers::create::<P>).route_layer(required.clone()));

    let item = get(handlers::get_post::<P>).route_layer(optional).merge(
        put(handlers::update::<P>)
            .patch(handlers::update::<P>)
            .delete(handlers::delete::<P>)
            .route_layer(required.clone()),
    );

    Router::new()
        .route("/", collection)
        .route("/stats", get(handlers::stats::<P>))
        .route("/my-posts", get(handlers::my_posts::<P>).route_layer(required))
        .route("/user/{username}", get(handlers::by_username::<P>))
        .route("/{id}", item)
        .with_state(PostsAppState { posts })
}
