//! Configuration module for finance-server
//!
//! Provides TOML loading for the server, database, cache and projection
//! limit settings.

pub mod server;

pub use server::{
    CacheConfig, DatabaseConfig, ProjectionLimits, ServerConfig, ServerConfigError, ServerInfoConfig,
};
