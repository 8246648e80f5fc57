//! Storage and clock abstractions behind the cache store

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::GroupBy;

/// A cached projection as stored by a backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub building_id: String,
    pub cache_key: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub group_by: GroupBy,
    /// Serialized [`Projection`](crate::model::Projection)
    pub payload: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Aggregate view over every stored entry
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub total_entries: u64,
    pub expired_entries: u64,
    pub oldest_entry: Option<DateTime<Utc>>,
    pub newest_entry: Option<DateTime<Utc>>,
}

/// Persistence backend for cache entries
///
/// Implementations must tolerate concurrent readers and writers. `save`
/// overwrites any entry with the same building and cache key.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Fetch an entry regardless of expiry
    async fn load(&self, building_id: &str, cache_key: &str) -> Result<Option<CacheEntry>>;

    /// Insert or replace an entry
    async fn save(&self, entry: CacheEntry) -> Result<()>;

    /// Delete every entry of a building, returning how many were removed
    async fn remove_building(&self, building_id: &str) -> Result<u64>;

    /// Delete every entry expired at `now`, returning how many were removed
    async fn remove_expired(&self, now: DateTime<Utc>) -> Result<u64>;

    /// Statistics as of `now`
    async fn stats(&self, now: DateTime<Utc>) -> Result<CacheStats>;
}

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}
