//! Router assembly: every route, the shared layers and the JSON fallback.

use std::sync::Arc;
use std::time::{Duration, Instant};

use auth::middleware::AuthGate;
use auth::presentation::AuthAppState;
use auth::{AuthConfig, AuthoredContent, UserRepository, auth_router};
use axum::extract::{DefaultBodyLimit, OriginalUri, State};
use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use kernel::AppError;
use platform::rate_limit::{InMemoryRateLimitStore, RateLimitConfig, RateLimiter};
use posts::{PostRepository, posts_router};
use serde_json::{Value, json};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;

/// Request bodies above this are rejected with 413.
pub const BODY_LIMIT_BYTES: usize = 10 * 1024;

/// The two independently counted limiters.
#[derive(Clone)]
pub struct Limiters {
    /// Register and login
    pub auth: RateLimiter<InMemoryRateLimitStore>,
    /// Public post listing
    pub api: RateLimiter<InMemoryRateLimitStore>,
}

impl Limiters {
    pub fn new(trust_proxy: bool) -> Self {
        Self::with_configs(RateLimitConfig::auth(), RateLimitConfig::api(), trust_proxy)
    }

    pub fn with_configs(auth: RateLimitConfig, api: RateLimitConfig, trust_proxy: bool) -> Self {
        Self {
            auth: RateLimiter::new(InMemoryRateLimitStore::new(), auth).with_trust_proxy(trust_proxy),
            api: RateLimiter::new(InMemoryRateLimitStore::new(), api).with_trust_proxy(trust_proxy),
        }
    }

    pub fn spawn_sweepers(&self, every: Duration) {
        self.auth.spawn_sweeper(every);
        self.api.spawn_sweeper(every);
    }
}

#[derive(Clone)]
struct Health {
    started: Instant,
    environment: &'static str,
}

/// Assemble the full application over any pair of stores.
///
/// `posts` doubles as the target of the username fan-out.
pub fn router<U, P>(
    users: Arc<U>,
    posts: Arc<P>,
    auth: Arc<AuthConfig>,
    limiters: &Limiters,
    config: &AppConfig,
) -> Router
where
    U: UserRepository + Send + Sync + 'static,
    P: PostRepository + AuthoredContent + Send + Sync + 'static,
{
    let gate = AuthGate::new(users.clone(), auth.clone());
    let auth_state = AuthAppState {
        repo: users,
        content: posts.clone(),
        config: auth,
    };

    let health = Router::new().route("/api/health", get(health)).with_state(Health {
        started: Instant::now(),
        environment: config.environment.as_str(),
    });

    Router::new()
        .merge(health)
        .nest("/api/auth", auth_router(auth_state, limiters.auth.clone()))
        .nest("/api/posts", posts_router(posts, gate, limiters.api.clone()))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors(&config.frontend_origins))
}

fn cors(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true)
}

/// GET /api/health. Bare JSON, no envelope.
async fn health(State(health): State<Health>) -> Json<Value> {
    let begin = Instant::now();
    let mut body = json!({
        "status": "OK",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "uptime": health.started.elapsed().as_secs_f64(),
        "environment": health.environment,
    });
    body["responseTimeMs"] = json!(begin.elapsed().as_secs_f64() * 1000.0);
    Json(body)
}

async fn not_found(OriginalUri(uri): OriginalUri) -> AppError {
    AppError::not_found(format!("Cannot find {uri} on this server"))
}
