//! Database connection management

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::sync::Arc;

/// Type alias for the database connection pool
pub type DatabasePool = SqlitePool;

/// Database connection wrapper
#[derive(Clone)]
pub struct DatabaseConnection {
    pool: Arc<DatabasePool>,
}

impl DatabaseConnection {
    /// Connect to `database_url` (e.g. "sqlite://finance.db?mode=rwc")
    /// with a pool of at most `max_connections`
    ///
    /// An in-memory database is private to one connection, so callers using
    /// `sqlite::memory:` should pass a pool size of 1.
    pub async fn with_max_connections(
        database_url: &str,
        max_connections: u32,
    ) -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Run migrations on the database
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(self.pool.as_ref()).await
    }

    /// Perform a health check by running a simple query
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").fetch_one(self.pool.as_ref()).await?;
        Ok(())
    }

    /// Close the connection pool gracefully
    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory() -> DatabaseConnection {
        DatabaseConnection::with_max_connections("sqlite::memory:", 1)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_check_success() {
        let conn = memory().await;
        assert!(conn.health_check().await.is_ok());
    }

    #[tokio::test]
    async fn test_migrations_create_tables() {
        let conn = memory().await;
        conn.run_migrations().await.unwrap();

        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('buildings', 'bills', 'residences', 'financial_cache')",
        )
        .fetch_one(conn.pool())
        .await
        .unwrap();
        assert_eq!(count, 4);
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let conn = memory().await;
        conn.run_migrations().await.unwrap();
        assert!(conn.run_migrations().await.is_ok());
    }
}
