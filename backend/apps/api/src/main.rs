//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod app;
mod config;


use std::net::SocketAddr;
use std::sync::Arc;

use auth::{InMemoryAuthRepository, PgAuthRepository};
use kernel::error::conversions::set_expose_stack;
use platform::rate_limit::SWEEP_INTERVAL;
use posts::{InMemoryPostRepository, PgPostRepository};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::Limiters;
use crate::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,auth=info,posts=info,platform=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    set_expose_stack(!config.environment.is_production());

    let auth_config = Arc::new(config.auth_config()?);
    let limiters = Limiters::new(config.trust_proxy);
    limiters.spawn_sweepers(SWEEP_INTERVAL);

    let app = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(database_url)
                .await?;

            tracing::info!("Connected to database");

            // Run migrations
            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;

            tracing::info!("Migrations completed");

            app::router(
                Arc::new(PgAuthRepository::new(pool.clone())),
                Arc::new(PgPostRepository::new(pool)),
                auth_config,
                &limiters,
                &config,
            )
        }
        None => {
            tracing::warn!("DATABASE_URL unset, using in-memory storage");
            app::router(
                Arc::new(InMemoryAuthRepository::new()),
                Arc::new(InMemoryPostRepository::new()),
                auth_config,
                &limiters,
                &config,
            )
        }
    };

    // Start server
    let addr = config.addr();
    tracing::info!(
        environment = config.environment.as_str(),
        "Listening on {}",
        addr
    );

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
