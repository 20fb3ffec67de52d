//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache warm-up, hit worker spawning, and the
//! Axum server lifecycle.

use crate::application::services::{AuthService, RedirectService};
use crate::config::Config;
use crate::domain::hit_worker::{HitLogger, run_hit_worker};
use crate::domain::repositories::RedirectRepository;
use crate::infrastructure::cache::RedirectCache;
use crate::infrastructure::persistence::PgRedirectRepository;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;

/// Upper bound for flushing queued hits after the listener stops.
const HIT_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Redirect cache, warmed with the active rule set
/// - Background hit worker
/// - Axum HTTP server with graceful shutdown
///
/// A failed warm-up is not fatal: the cache starts empty and loads on the
/// first lookup.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - The admin token hash cannot be decoded
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let repository: Arc<dyn RedirectRepository> =
        Arc::new(PgRedirectRepository::new(Arc::new(pool)));

    let redirect_cache = Arc::new(
        RedirectCache::new(repository.clone(), config.cache_ttl())
            .with_load_timeout(config.store_timeout()),
    );
    let rules = redirect_cache.load_all_redirects().await;
    tracing::info!(rules = rules.len(), "Redirect cache warmed");

    let (hit_logger, hit_rx) = HitLogger::channel(config.hit_queue_capacity);
    let hit_worker = tokio::spawn(run_hit_worker(
        hit_rx,
        repository.clone(),
        config.hit_worker_concurrency,
        config.store_timeout(),
    ));
    tracing::info!(
        concurrency = config.hit_worker_concurrency,
        "Hit worker started"
    );

    let auth_service = AuthService::new(
        config.token_signing_secret.clone(),
        &config.admin_token_hash,
    )
    .context("ADMIN_TOKEN_HASH must be hex-encoded")?;

    let redirect_service = Arc::new(RedirectService::new(repository, redirect_cache.clone()));

    let state = AppState::new(
        redirect_cache,
        redirect_service,
        Arc::new(auth_service),
        hit_logger,
    );

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router held the last HitLogger; the worker now drains and exits.
    match tokio::time::timeout(HIT_DRAIN_TIMEOUT, hit_worker).await {
        Ok(Ok(())) => tracing::info!("Hit queue drained"),
        Ok(Err(e)) => tracing::error!(error = %e, "Hit worker panicked"),
        Err(_) => tracing::warn!("Timed out draining hit queue, pending hits lost"),
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
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
