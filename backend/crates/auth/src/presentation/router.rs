//! Auth Router

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post},
};
use platform::rate_limit::{RateLimitStore, RateLimiter, enforce_rate_limit};

use crate::domain::repository::{AuthoredContent, UserRepository};
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthGate, require_auth};

/// Create the Auth router
///
/// `limiter` guards register and login only; every other route sits behind
/// the mandatory gate.
pub fn auth_router<R, C, S>(state: AuthAppState<R, C>, limiter: RateLimiter<S>) -> Router
where
    R: UserRepository + Send + Sync + 'static,
    C: AuthoredContent + Send + Sync + 'static,
    S: RateLimitStore + Send + Sync + 'static,
{
    let gate = AuthGate::new(state.repo.clone(), state.config.clone());

    let limited = from_fn_with_state(limiter, enforce_rate_limit::<S>);
    let required = from_fn_with_state(gate, require_auth::<R>);

    // Layered per method router so an unsupported method still answers 405
    Router::new()
        .route("/register", post(handlers::register::<R, C>).route_layer(limited.clone()))
        .route("/login", post(handlers::login::<R, C>).route_layer(limited))
        .route("/me", get(handlers::me).route_layer(required.clone()))
        .route(
            "/update-profile",
            patch(handlers::update_profile::<R, C>).route_layer(required.clone()),
        )
        .route(
            "/change-password",
            patch(handlers::change_password::<R, C>).route_layer(required.clone()),
        )
        .route(
            "/delete-account",
            delete(handlers::delete_account::<R, C>).route_layer(required),
        )
        .with_state(state)
}
