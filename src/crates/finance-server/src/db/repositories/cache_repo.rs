//! Projection cache repository
//!
//! Timestamps are compared as text; they are always written with
//! [`timestamp`](crate::db::models::cache_entry::timestamp).

use crate::db::connection::DatabasePool;
use crate::db::models::CacheEntryRow;

/// Raw statistics over the cache table
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CacheRowStats {
    pub total_entries: i64,
    pub expired_entries: i64,
    pub oldest_entry: Option<String>,
    pub newest_entry: Option<String>,
}

/// Cache repository for the financial_cache table
pub struct CacheRepository;

impl CacheRepository {
    /// Insert or overwrite the entry for (building_id, cache_key)
    pub async fn upsert(pool: &DatabasePool, row: &CacheEntryRow) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO financial_cache
                 (building_id, cache_key, start_date, end_date, group_by, payload, created_at, expires_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (building_id, cache_key) DO UPDATE SET
                 start_date = excluded.start_date,
                 end_date = excluded.end_date,
                 group_by = excluded.group_by,
                 payload = excluded.payload,
                 created_at = excluded.created_at,
                 expires_at = excluded.expires_at",
        )
        .bind(&row.building_id)
        .bind(&row.cache_key)
        .bind(&row.start_date)
        .bind(&row.end_date)
        .bind(&row.group_by)
        .bind(&row.payload)
        .bind(&row.created_at)
        .bind(&row.expires_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Get the entry for (building_id, cache_key), expired or not
    pub async fn get(
        pool: &DatabasePool,
        building_id: &str,
        cache_key: &str,
    ) -> Result<Option<CacheEntryRow>, sqlx::Error> {
        sqlx::query_as::<_, CacheEntryRow>(
            "SELECT * FROM financial_cache WHERE building_id = ? AND cache_key = ?",
        )
        .bind(building_id)
        .bind(cache_key)
        .fetch_optional(pool)
        .await
    }

    /// Delete every entry of a building
    pub async fn delete_by_building(pool: &DatabasePool, building_id: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM financial_cache WHERE building_id = ?")
            .bind(building_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete every entry expiring at or before `now`
    pub async fn delete_expired(pool: &DatabasePool, now: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM financial_cache WHERE expires_at <= ?")
            .bind(now)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Totals as of `now`
    pub async fn stats(pool: &DatabasePool, now: &str) -> Result<CacheRowStats, sqlx::Error> {
        sqlx::query_as::<_, CacheRowStats>(
            "SELECT COUNT(*) AS total_entries,
                    COALESCE(SUM(CASE WHEN expires_at <= ? THEN 1 ELSE 0 END), 0) AS expired_entries,
                    MIN(created_at) AS oldest_entry,
                    MAX(created_at) AS newest_entry
             FROM financial_cache",
        )
        .bind(now)
        .fetch_one(pool)
        .await
    }
}
