//! Auth Gate
//!
//! Resolves `Authorization: Bearer <token>` into a user.
//!
//! - [`require_auth`] rejects the request with 401 when resolution fails and
//!   otherwise inserts [`CurrentUser`] into the request extensions.
//! - [`optional_auth`] never rejects; it inserts [`Viewer`], empty when no
//!   valid token was presented.

use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::{HeaderMap, header, request::Parts};
use axum::middleware::Next;
use axum::response::Response;

use crate::application::AuthenticateUseCase;
use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};

/// Gate state: where users live and how tokens are checked.
pub struct AuthGate<R> {
    pub users: Arc<R>,
    pub config: Arc<AuthConfig>,
}

impl<R> Clone for AuthGate<R> {
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
            config: self.config.clone(),
        }
    }
}

impl<R> AuthGate<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    pub fn new(users: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { users, config }
    }

    async fn resolve(&self, headers: &HeaderMap) -> AuthResult<User> {
        AuthenticateUseCase::new(self.users.clone(), self.config.clone())
            .execute(bearer_token(headers))
            .await
    }
}

/// The token after `Bearer `, if one is present and non-empty.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Middleware for protected routes
pub async fn require_auth<R>(
    State(gate): State<AuthGate<R>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    R: UserRepository + Send + Sync + 'static,
{
    let user = gate.resolve(req.headers()).await?;
    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}

/// Middleware for routes that work with or without a user
pub async fn optional_auth<R>(
    State(gate): State<AuthGate<R>>,
    mut req: Request,
    next: Next,
) -> Response
where
    R: UserRepository + Send + Sync + 'static,
{
    let viewer = match gate.resolve(req.headers()).await {
        Ok(user) => Some(CurrentUser(user)),
        Err(e) => {
            if !matches!(e, AuthError::NotLoggedIn) {
                tracing::debug!(error = %e, "Ignoring credentials on optional route");
            }
            None
        }
    };
    req.extensions_mut().insert(Viewer(viewer));
    next.run(req).await
}

// ============================================================================
// Extractors
// ============================================================================

/// The authenticated user, placed by [`require_auth`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn id(&self) -> &UserId {
        &self.0.id
    }

    pub fn user(&self) -> &User {
        &self.0
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AuthError::NotLoggedIn)
    }
}

/// Who is looking, if anyone. Placed by [`optional_auth`].
#[derive(Debug, Clone, Default)]
pub struct Viewer(pub Option<CurrentUser>);

impl Viewer {
    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }
}

impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Viewer>().cloned().unwrap_or_default())
    }
}
