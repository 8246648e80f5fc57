//! TTL-aware cache store

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use super::key::CacheKey;
use super::memory::MemoryCacheBackend;
use super::traits::{CacheBackend, CacheEntry, CacheStats, Clock, SystemClock};
use crate::error::{ProjectionError, Result};
use crate::model::Projection;

/// Cache of computed projections with absolute expiry
///
/// Built once at startup and shared by `Arc`; there is no process-wide
/// instance.
#[derive(Clone)]
pub struct CacheStore {
    backend: Arc<dyn CacheBackend>,
    clock: Arc<dyn Clock>,
    default_ttl: Duration,
}

impl CacheStore {
    pub fn new(backend: Arc<dyn CacheBackend>, clock: Arc<dyn Clock>, default_ttl: Duration) -> Self {
        Self {
            backend,
            clock,
            default_ttl,
        }
    }

    /// Store backed by process memory and the system clock
    pub fn in_memory(default_ttl: Duration) -> Self {
        Self::new(
            Arc::new(MemoryCacheBackend::new()),
            Arc::new(SystemClock),
            default_ttl,
        )
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Fetch a live projection
    ///
    /// Expired entries are misses even when the backend still holds them.
    /// A payload that no longer deserializes is reported as a miss so the
    /// caller recomputes and overwrites it.
    pub async fn get(&self, building_id: &str, key: &CacheKey) -> Result<Option<Projection>> {
        let Some(entry) = self.backend.load(building_id, key.as_str()).await? else {
            tracing::debug!(building_id, key = %key, "Cache miss");
            return Ok(None);
        };

        if entry.is_expired(self.clock.now()) {
            tracing::debug!(building_id, key = %key, "Cache entry expired");
            return Ok(None);
        }

        match serde_json::from_str::<Projection>(&entry.payload) {
            Ok(projection) => {
                tracing::debug!(building_id, key = %key, "Cache hit");
                Ok(Some(projection))
            }
            Err(e) => {
                tracing::warn!(building_id, key = %key, "Discarding unreadable cache payload: {}", e);
                Ok(None)
            }
        }
    }

    /// Write a projection, replacing any entry with the same key
    ///
    /// `ttl` defaults to the store's default TTL.
    pub async fn set(
        &self,
        building_id: &str,
        key: &CacheKey,
        projection: &Projection,
        ttl: Option<Duration>,
    ) -> Result<()> {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| ProjectionError::Cache(format!("TTL out of range: {}", e)))?;
        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| ProjectionError::Cache(format!("TTL of {}s is out of range", ttl.num_seconds())))?;
        let range = key.range();

        let entry = CacheEntry {
            building_id: building_id.to_string(),
            cache_key: key.as_str().to_string(),
            start_date: range.start,
            end_date: range.end,
            group_by: key.group_by(),
            payload: serde_json::to_string(projection)?,
            created_at: now,
            expires_at,
        };
        self.backend.save(entry).await?;
        tracing::debug!(building_id, key = %key, "Cached projection");
        Ok(())
    }

    /// Remove every entry of a building
    pub async fn invalidate_building(&self, building_id: &str) -> Result<u64> {
        self.backend.remove_building(building_id).await
    }

    /// Physically delete expired entries
    pub async fn sweep_expired(&self) -> Result<u64> {
        let removed = self.backend.remove_expired(self.clock.now()).await?;
        if removed > 0 {
            tracing::info!(removed, "Swept expired projection cache entries");
        }
        Ok(removed)
    }

    pub async fn stats(&self) -> Result<CacheStats> {
        self.backend.stats(self.clock.now()).await
    }
}

/// Periodically sweep expired entries until the runtime shuts down
pub fn spawn_sweeper(store: Arc<CacheStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if let Err(e) = store.sweep_expired().await {
                tracing::warn!("Projection cache sweep failed: {}", e);
            }
        }
    })
}
