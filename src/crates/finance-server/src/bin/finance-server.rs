//! Finance server binary
//!
//! Standalone server exposing the projection, cache administration and
//! record management REST API.

use std::net::SocketAddr;

use anyhow::Context;
use finance_server::config::ServerConfig;
use finance_server::db::DatabaseConnection;
use finance_server::{create_router, start_cache_sweeper, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing/logging
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt().with_env_filter(rust_log).init();

    tracing::info!("Loading server configuration...");
    let config = match ServerConfig::load() {
        Ok(cfg) => {
            tracing::info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            tracing::warn!("Failed to load configuration file: {}. Using defaults.", e);
            ServerConfig::default()
        }
    };

    tracing::info!("Server name: {}", config.server.name);
    tracing::info!("Database Path: {}", config.database.path);
    tracing::info!(
        "Cache TTL: {}s, sweep every {}s",
        config.cache.ttl_seconds,
        config.cache.sweep_interval_seconds
    );

    // HOST and PORT override the configured address
    let port = match std::env::var("PORT") {
        Ok(raw) => raw.parse::<u16>().context("PORT must be a valid u16")?,
        Err(_) => config.server.port,
    };
    let host = std::env::var("HOST").unwrap_or_else(|_| config.server.host.clone());
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?;

    let database_url = config.database_url();
    tracing::info!("Connecting to database: {}", database_url);
    let db = DatabaseConnection::with_max_connections(&database_url, config.database.max_connections)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Running database migrations");
    db.run_migrations().await.context("Failed to run migrations")?;

    tracing::info!("Performing database health check");
    db.health_check().await.context("Database health check failed")?;

    let state = AppState::new(db.clone(), &config);
    let sweeper = start_cache_sweeper(&state, &config);

    tracing::info!("Building API router");
    let app = create_router(state);

    tracing::info!("Starting finance server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    db.close().await;
    tracing::info!("Finance server shut down gracefully");
    Ok(())
}

/// Signal for graceful shutdown (Ctrl-C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install CTRL-C signal handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received CTRL-C signal, shutting down");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, shutting down");
        }
    }
}
