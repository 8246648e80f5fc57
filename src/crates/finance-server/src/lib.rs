//! HTTP server for condominium financial projections
//!
//! Stores buildings, bills and residences in SQLite, serves month-by-month
//! projections computed by [`condo_projection`], and keeps the projection
//! cache consistent by invalidating a building's entries whenever one of
//! its records changes.

pub mod api;
pub mod config;
pub mod db;

use std::sync::Arc;

use tokio::task::JoinHandle;

pub use api::{create_router, AppState};
pub use config::ServerConfig;

/// Start the background sweep of expired projection cache entries
pub fn start_cache_sweeper(state: &AppState, config: &ServerConfig) -> JoinHandle<()> {
    condo_projection::spawn_sweeper(Arc::clone(state.cache_store()), config.cache.sweep_interval())
}
