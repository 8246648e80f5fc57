//! Database module for finance-server
//!
//! Provides database connectivity, models, repositories and error handling
//! for buildings, bills, residences and the projection cache, plus the
//! SQLite-backed implementations of the projection engine's collaborators.

pub mod cache_backend;
pub mod connection;
pub mod error;
pub mod financial_source;
pub mod models;
pub mod repositories;

pub use cache_backend::SqliteCacheBackend;
pub use connection::{DatabaseConnection, DatabasePool};
pub use error::DatabaseError;
pub use financial_source::SqlFinancialSource;
