//! HTTP server initialization and runtime setup.
//!
//! Handles store selection, migrations, registry wiring, key bootstrap, cache
//! eviction and the Axum server lifecycle.

use crate::application::services::{BootstrapOutcome, CodeRegistry, KeyRegistry};
use crate::config::Config;
use crate::domain::repositories::{ApiKeyRepository, ShortCodeRepository};
use crate::infrastructure::persistence::{
    InMemoryApiKeyRepository, InMemoryShortCodeRepository, PgApiKeyRepository,
    PgShortCodeRepository,
};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};

type Stores = (Arc<dyn ShortCodeRepository>, Arc<dyn ApiKeyRepository>);

/// Connects to PostgreSQL and applies migrations, or falls back to the
/// in-memory store when no database is configured.
async fn open_stores(config: &Config) -> Result<Stores> {
    let Some(ref database_url) = config.database_url else {
        warn!("No database configured. Using in-memory store; data is lost on restart.");
        let codes: Arc<dyn ShortCodeRepository> = Arc::new(InMemoryShortCodeRepository::new());
        let keys: Arc<dyn ApiKeyRepository> = Arc::new(InMemoryApiKeyRepository::new());
        return Ok((codes, keys));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate")?;

    let pool = Arc::new(pool);
    let codes: Arc<dyn ShortCodeRepository> = Arc::new(PgShortCodeRepository::new(pool.clone()));
    let keys: Arc<dyn ApiKeyRepository> = Arc::new(PgApiKeyRepository::new(pool));
    Ok((codes, keys))
}

/// Builds the shared state: both registries with the configured cache policy,
/// plus the default API key bootstrap.
///
/// # Errors
///
/// Returns an error if the default key is blank or the store fails.
pub async fn build_state(
    config: &Config,
    codes: Arc<dyn ShortCodeRepository>,
    keys: Arc<dyn ApiKeyRepository>,
) -> Result<AppState> {
    let policy = config.cache_policy();
    let code_registry = Arc::new(CodeRegistry::new(codes, policy));
    let key_registry = Arc::new(KeyRegistry::new(keys, policy));

    match key_registry
        .bootstrap(&config.api_default_key)
        .await
        .context("Failed to bootstrap default API key")?
    {
        BootstrapOutcome::Created(key) => info!(name = %key.name, "Default API key created"),
        BootstrapOutcome::Skipped(reason) => info!(?reason, "Default API key bootstrap skipped"),
    }

    Ok(AppState::new(code_registry, key_registry))
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool and migrations (or the in-memory store)
/// - Code and key registries with their caches
/// - Default API key bootstrap
/// - Cache eviction tasks
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Default key bootstrap fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let (codes, keys) = open_stores(&config).await?;
    let state = build_state(&config, codes, keys).await?;

    let interval = config.cache_eviction_interval();
    let eviction_tasks = vec![
        state
            .code_registry
            .cache()
            .spawn_eviction_task("short_codes", interval),
        state
            .key_registry
            .cache()
            .spawn_eviction_task("api_keys", interval),
    ];
    info!(?interval, "Cache eviction started");

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal(eviction_tasks))
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for Ctrl+C or SIGTERM, then stops the background tasks.
async fn shutdown_signal(background: Vec<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating shutdown..."),
        _ = terminate => info!("Received SIGTERM, initiating shutdown..."),
    }

    for task in background {
        task.abort();
    }
}
