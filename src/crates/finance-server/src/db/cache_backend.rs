//! Projection cache persisted in the financial_cache table

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use condo_projection::{CacheBackend, CacheEntry, CacheStats, ProjectionError};

use crate::db::models::cache_entry::{parse_timestamp, timestamp};
use crate::db::models::CacheEntryRow;
use crate::db::repositories::CacheRepository;
use crate::db::DatabaseConnection;

/// [`CacheBackend`] storing one row per (building, cache key)
#[derive(Clone)]
pub struct SqliteCacheBackend {
    db: DatabaseConnection,
}

impl SqliteCacheBackend {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn cache_error(err: sqlx::Error) -> ProjectionError {
    ProjectionError::Cache(err.to_string())
}

#[async_trait]
impl CacheBackend for SqliteCacheBackend {
    async fn load(&self, building_id: &str, cache_key: &str) -> condo_projection::Result<Option<CacheEntry>> {
        let Some(row) = CacheRepository::get(self.db.pool(), building_id, cache_key)
            .await
            .map_err(cache_error)?
        else {
            return Ok(None);
        };

        let id = row.id;
        let entry = row.into_entry();
        if entry.is_none() {
            tracing::warn!(building_id, cache_key, row_id = id, "Ignoring unreadable cache row");
        }
        Ok(entry)
    }

    async fn save(&self, entry: CacheEntry) -> condo_projection::Result<()> {
        CacheRepository::upsert(self.db.pool(), &CacheEntryRow::from_entry(&entry))
            .await
            .map_err(cache_error)
    }

    async fn remove_building(&self, building_id: &str) -> condo_projection::Result<u64> {
        CacheRepository::delete_by_building(self.db.pool(), building_id)
            .await
            .map_err(cache_error)
    }

    async fn remove_expired(&self, now: DateTime<Utc>) -> condo_projection::Result<u64> {
        CacheRepository::delete_expired(self.db.pool(), &timestamp(now))
            .await
            .map_err(cache_error)
    }

    async fn stats(&self, now: DateTime<Utc>) -> condo_projection::Result<CacheStats> {
        let raw = CacheRepository::stats(self.db.pool(), &timestamp(now))
            .await
            .map_err(cache_error)?;
        Ok(CacheStats {
            total_entries: raw.total_entries.max(0) as u64,
            expired_entries: raw.expired_entries.max(0) as u64,
            oldest_entry: raw.oldest_entry.as_deref().and_then(parse_timestamp),
            newest_entry: raw.newest_entry.as_deref().and_then(parse_timestamp),
        })
    }
}
