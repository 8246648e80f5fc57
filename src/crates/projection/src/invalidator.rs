//! Building-wide cache invalidation

use std::fmt;
use std::sync::Arc;

use crate::cache::CacheStore;
use crate::error::Result;

/// A change to source records that makes cached projections stale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    BillCreated,
    BillUpdated,
    BillDeleted,
    ResidenceCreated,
    ResidenceUpdated,
    ResidenceDeleted,
    BuildingCreated,
    BuildingUpdated,
    BuildingDeleted,
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            ChangeEvent::BillCreated => "bill created",
            ChangeEvent::BillUpdated => "bill updated",
            ChangeEvent::BillDeleted => "bill deleted",
            ChangeEvent::ResidenceCreated => "residence created",
            ChangeEvent::ResidenceUpdated => "residence updated",
            ChangeEvent::ResidenceDeleted => "residence deleted",
            ChangeEvent::BuildingCreated => "building created",
            ChangeEvent::BuildingUpdated => "building updated",
            ChangeEvent::BuildingDeleted => "building deleted",
        };
        f.write_str(reason)
    }
}

/// Drops every cached projection of a building when its records change
///
/// Precision is traded for simplicity: no attempt is made to find which
/// cache keys a change actually affects.
#[derive(Clone)]
pub struct CacheInvalidator {
    store: Arc<CacheStore>,
}

impl CacheInvalidator {
    pub fn new(store: Arc<CacheStore>) -> Self {
        Self { store }
    }

    /// Remove all entries of `building_id`, logging `reason`
    pub async fn invalidate(&self, building_id: &str, reason: &str) -> Result<u64> {
        let removed = self.store.invalidate_building(building_id).await?;
        tracing::info!(building_id, removed, reason, "Invalidated projection cache");
        Ok(removed)
    }

    /// Invalidate in response to a mutation of source records
    pub async fn notify(&self, building_id: &str, event: ChangeEvent) -> Result<u64> {
        self.invalidate(building_id, &event.to_string()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheKey;
    use crate::model::{DateRange, GroupBy, Projection};
    use std::time::Duration;

    #[tokio::test]
    async fn test_invalidate_removes_all_building_keys() {
        let store = Arc::new(CacheStore::in_memory(Duration::from_secs(600)));
        let monthly = CacheKey::new(DateRange::years(2024, 2024).unwrap(), GroupBy::Monthly);
        let yearly = CacheKey::new(DateRange::years(2024, 2030).unwrap(), GroupBy::Yearly);
        store.set("bld-1", &monthly, &Projection::empty(), None).await.unwrap();
        store.set("bld-1", &yearly, &Projection::empty(), None).await.unwrap();
        store.set("bld-2", &monthly, &Projection::empty(), None).await.unwrap();

        let invalidator = CacheInvalidator::new(store.clone());
        let removed = invalidator.notify("bld-1", ChangeEvent::BillUpdated).await.unwrap();

        assert_eq!(removed, 2);
        assert!(store.get("bld-1", &monthly).await.unwrap().is_none());
        assert!(store.get("bld-2", &monthly).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_invalidate_empty_building_is_noop() {
        let store = Arc::new(CacheStore::in_memory(Duration::from_secs(600)));
        let invalidator = CacheInvalidator::new(store);
        assert_eq!(invalidator.invalidate("ghost", "manual").await.unwrap(), 0);
    }

    #[test]
    fn test_change_event_reason() {
        assert_eq!(ChangeEvent::ResidenceDeleted.to_string(), "residence deleted");
    }
}
