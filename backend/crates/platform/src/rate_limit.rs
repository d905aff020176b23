//! Rate Limiting Infrastructure
//!
//! Fixed-window counters keyed by client address, behind a pluggable
//! [`RateLimitStore`]. The first request from a key opens a window with count
//! 1; later requests inside the window increment; once the count exceeds
//! `max_requests` the request is rejected until the window lapses.
//!
//! Windows expire lazily on the next request from the same key, and a
//! periodic sweep ([`RateLimiter::spawn_sweeper`]) drops keys that went quiet.

use std::borrow::Cow;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderValue, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use kernel::AppError;
use thiserror::Error;

/// Interval of the background eviction sweep
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
    /// Message returned with the 429 response
    pub message: Cow<'static, str>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::api()
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u64, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
            message: message.into(),
        }
    }

    /// Credential endpoints: 10 requests per 15 minutes.
    pub fn auth() -> Self {
        Self::new(
            10,
            15 * 60,
            "Too many login attempts, please try again after 15 minutes.",
        )
    }

    /// General read endpoints: 100 requests per 15 minutes.
    pub fn api() -> Self {
        Self::new(
            100,
            15 * 60,
            "Too many requests from this IP, please try again later.",
        )
    }

    pub fn window_ms(&self) -> i64 {
        self.window.as_millis() as i64
    }
}

/// Rate limit check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_at_ms: i64,
}

impl RateLimitResult {
    /// Whole seconds until the window resets, at least 1.
    pub fn retry_after_secs(&self, now_ms: i64) -> u64 {
        let ms = (self.reset_at_ms - now_ms).max(0) as u64;
        ms.div_ceil(1000).max(1)
    }
}

#[derive(Debug, Error)]
pub enum RateLimitStoreError {
    #[error("Rate limit store lock poisoned")]
    Poisoned,

    #[error("Rate limit store unavailable: {0}")]
    Unavailable(String),
}

/// Trait for rate limit storage backends
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Count this request against `key` and report whether it is allowed.
    /// The read-modify-write must be atomic per key.
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, RateLimitStoreError>;

    /// Drop every window that has lapsed. Returns the number removed.
    async fn evict_expired(&self, config: &RateLimitConfig) -> Result<usize, RateLimitStoreError>;
}

// ============================================================================
// In-memory store
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at_ms: i64,
    count: u32,
}

/// Process-local store. Correct for a single server instance only.
#[derive(Debug, Default)]
pub struct InMemoryRateLimitStore {
    windows: Mutex<HashMap<String, Window>>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check-and-increment at an explicit clock reading.
    pub fn check_at(
        &self,
        key: &str,
        config: &RateLimitConfig,
        now_ms: i64,
    ) -> Result<RateLimitResult, RateLimitStoreError> {
        let mut windows = self
            .windows
            .lock()
            .map_err(|_| RateLimitStoreError::Poisoned)?;

        let window = windows
            .entry(key.to_string())
            .and_modify(|w| {
                if now_ms >= w.started_at_ms + config.window_ms() {
                    *w = Window {
                        started_at_ms: now_ms,
                        count: 1,
                    };
                } else {
                    w.count = w.count.saturating_add(1);
                }
            })
            .or_insert(Window {
                started_at_ms: now_ms,
                count: 1,
            });

        Ok(RateLimitResult {
            allowed: window.count <= config.max_requests,
            remaining: config.max_requests.saturating_sub(window.count),
            reset_at_ms: window.started_at_ms + config.window_ms(),
        })
    }

    /// Eviction at an explicit clock reading.
    pub fn evict_expired_at(
        &self,
        config: &RateLimitConfig,
        now_ms: i64,
    ) -> Result<usize, RateLimitStoreError> {
        let mut windows = self
            .windows
            .lock()
            .map_err(|_| RateLimitStoreError::Poisoned)?;
        let before = windows.len();
        windows.retain(|_, w| now_ms < w.started_at_ms + config.window_ms());
        Ok(before - windows.len())
    }

    /// Number of tracked keys
    pub fn len(&self) -> usize {
        self.windows.lock().map(|w| w.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RateLimitStore for InMemoryRateLimitStore {
    async fn check_and_increment(
        &self,
        key: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, RateLimitStoreError> {
        self.check_at(key, config, now_ms())
    }

    async fn evict_expired(&self, config: &RateLimitConfig) -> Result<usize, RateLimitStoreError> {
        self.evict_expired_at(config, now_ms())
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

// ============================================================================
// Middleware
// ============================================================================

/// One independently counted limiter: a store plus its configuration.
pub struct RateLimiter<S> {
    store: Arc<S>,
    config: Arc<RateLimitConfig>,
    trust_proxy: bool,
}

impl<S> Clone for RateLimiter<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            config: self.config.clone(),
            trust_proxy: self.trust_proxy,
        }
    }
}

impl<S> RateLimiter<S>
where
    S: RateLimitStore + Sync + 'static,
{
    pub fn new(store: S, config: RateLimitConfig) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
            trust_proxy: false,
        }
    }

    /// Honor `X-Forwarded-For` when keying clients.
    pub fn with_trust_proxy(mut self, trust_proxy: bool) -> Self {
        self.trust_proxy = trust_proxy;
        self
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Periodically evict lapsed windows. Runs until the runtime shuts down.
    pub fn spawn_sweeper(&self, every: Duration) -> tokio::task::JoinHandle<()> {
        let store = self.store.clone();
        let config = self.config.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            // The first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match store.evict_expired(&config).await {
                    Ok(0) => {}
                    Ok(evicted) => tracing::debug!(evicted, "Rate limit windows evicted"),
                    Err(e) => tracing::warn!(error = %e, "Rate limit sweep failed"),
                }
            }
        })
    }
}

/// Reject the request with 429 once the caller's window is exhausted.
///
/// Store failures fail open: the request proceeds and the error is logged.
pub async fn enforce_rate_limit<S>(
    State(limiter): State<RateLimiter<S>>,
    req: Request,
    next: Next,
) -> Response
where
    S: RateLimitStore + Sync + 'static,
{
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    let key = crate::client::client_key(req.headers(), peer, limiter.trust_proxy);

    match limiter.store.check_and_increment(&key, &limiter.config).await {
        Ok(result) if result.allowed => next.run(req).await,
        Ok(result) => {
            tracing::warn!(client = %key, "Rate limit exceeded");
            let retry_after = result.retry_after_secs(now_ms());
            let mut response =
                AppError::too_many_requests(limiter.config.message.clone()).into_response();
            if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
            response
        }
        Err(e) => {
            tracing::error!(error = %e, client = %key, "Rate limit store failed, allowing request");
            next.run(req).await
        }
    }
}
