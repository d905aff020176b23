//! Process configuration read from the environment.
//!
//! `.env` is loaded by `main` before this runs, so both sources work.

use std::env;
use std::net::SocketAddr;

use anyhow::{Context, bail};
use auth::AuthConfig;
use platform::crypto::from_base64;
use platform::token::{DEFAULT_TOKEN_TTL_SECS, MIN_SECRET_LEN};

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub port: u16,
    /// Unset means in-memory storage (development only)
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub frontend_origins: Vec<String>,
    /// Decoded `TOKEN_SECRET`; `None` means a random per-process secret
    pub token_secret: Option<Vec<u8>>,
    pub token_ttl_secs: i64,
    pub password_pepper: Option<Vec<u8>>,
    /// Key clients by `X-Forwarded-For` when behind a reverse proxy
    pub trust_proxy: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let environment = match get("APP_ENV").as_deref() {
            None | Some("development") => Environment::Development,
            Some("production") => Environment::Production,
            Some(other) => bail!("APP_ENV must be development or production, got {other}"),
        };

        let port = match get("PORT") {
            Some(v) => v.parse().with_context(|| format!("PORT is not a port number: {v}"))?,
            None => DEFAULT_PORT,
        };

        let database_url = get("DATABASE_URL");
        if environment.is_production() && database_url.is_none() {
            bail!("DATABASE_URL must be set in production");
        }

        let database_max_connections = match get("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v
                .parse()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS is not a number: {v}"))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let frontend_origins = get("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect();

        let token_secret = match get("TOKEN_SECRET") {
            Some(v) => {
                let secret = from_base64(&v).context("TOKEN_SECRET is not valid base64")?;
                if secret.len() < MIN_SECRET_LEN {
                    bail!("TOKEN_SECRET must decode to at least {MIN_SECRET_LEN} bytes");
                }
                Some(secret)
            }
            None if environment.is_production() => bail!("TOKEN_SECRET must be set in production"),
            None => None,
        };

        let token_ttl_secs = match get("TOKEN_TTL_SECS") {
            Some(v) => v
                .parse()
                .with_context(|| format!("TOKEN_TTL_SECS is not a number: {v}"))?,
            None => DEFAULT_TOKEN_TTL_SECS,
        };

        let trust_proxy = match get("TRUST_PROXY").as_deref() {
            None => false,
            Some("1" | "true" | "yes") => true,
            Some("0" | "false" | "no") => false,
            Some(other) => bail!("TRUST_PROXY must be a boolean, got {other}"),
        };

        Ok(Self {
            environment,
            port,
            database_url,
            database_max_connections,
            frontend_origins,
            token_secret,
            token_ttl_secs,
            password_pepper: get("PASSWORD_PEPPER").map(String::into_bytes),
            trust_proxy,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    pub fn auth_config(&self) -> anyhow::Result<AuthConfig> {
        let ttl = chrono::Duration::seconds(self.token_ttl_secs);
        let config = match &self.token_secret {
            Some(secret) => AuthConfig::new(secret, ttl, self.password_pepper.clone())?,
            None => {
                tracing::warn!("TOKEN_SECRET unset, tokens will not survive a restart");
                AuthConfig::with_random_secret_ttl(ttl, self.password_pepper.clone())
            }
        };
        Ok(config)
    }
}
