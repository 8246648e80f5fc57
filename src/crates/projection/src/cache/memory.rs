//! In-process cache backend

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use super::traits::{CacheBackend, CacheEntry, CacheStats};
use crate::error::Result;

/// [`CacheBackend`] holding entries in a concurrent map
///
/// Entries are lost on restart, which is acceptable: every entry can be
/// recomputed from source records.
#[derive(Debug, Default)]
pub struct MemoryCacheBackend {
    entries: DashMap<(String, String), CacheEntry>,
}

impl MemoryCacheBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CacheBackend for MemoryCacheBackend {
    async fn load(&self, building_id: &str, cache_key: &str) -> Result<Option<CacheEntry>> {
        let key = (building_id.to_string(), cache_key.to_string());
        Ok(self.entries.get(&key).map(|entry| entry.value().clone()))
    }

    async fn save(&self, entry: CacheEntry) -> Result<()> {
        let key = (entry.building_id.clone(), entry.cache_key.clone());
        self.entries.insert(key, entry);
        Ok(())
    }

    async fn remove_building(&self, building_id: &str) -> Result<u64> {
        let before = self.entries.len();
        self.entries.retain(|(building, _), _| building != building_id);
        Ok(before.saturating_sub(self.entries.len()) as u64)
    }

    async fn remove_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        Ok(before.saturating_sub(self.entries.len()) as u64)
    }

    async fn stats(&self, now: DateTime<Utc>) -> Result<CacheStats> {
        let mut stats = CacheStats::default();
        for item in self.entries.iter() {
            let entry = item.value();
            stats.total_entries += 1;
            if entry.is_expired(now) {
                stats.expired_entries += 1;
            }
            stats.oldest_entry = Some(match stats.oldest_entry {
                Some(oldest) => oldest.min(entry.created_at),
                None => entry.created_at,
            });
            stats.newest_entry = Some(match stats.newest_entry {
                Some(newest) => newest.max(entry.created_at),
                None => entry.created_at,
            });
        }
        Ok(stats)
    }
}
