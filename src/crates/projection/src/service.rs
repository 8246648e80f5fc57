//! Cache-or-compute entry point of the engine

use std::sync::Arc;

use crate::builder::ProjectionBuilder;
use crate::cache::{CacheKey, CacheStore};
use crate::error::Result;
use crate::invalidator::CacheInvalidator;
use crate::model::{DateRange, GroupBy, Projection};
use crate::singleflight::SingleFlight;
use crate::source::FinancialSource;

/// A projection together with where it came from
#[derive(Debug, Clone)]
pub struct ProjectionOutcome {
    pub projection: Arc<Projection>,
    /// Served from the cache rather than computed for this call
    pub cached: bool,
}

/// Serves projections from the cache, computing and caching them on a miss
///
/// Concurrent misses for the same building and key share one computation.
pub struct ProjectionService {
    builder: ProjectionBuilder,
    store: Arc<CacheStore>,
    invalidator: CacheInvalidator,
    flight: SingleFlight<Result<Arc<Projection>>>,
}

impl ProjectionService {
    pub fn new(source: Arc<dyn FinancialSource>, store: Arc<CacheStore>) -> Self {
        Self {
            builder: ProjectionBuilder::new(source),
            invalidator: CacheInvalidator::new(store.clone()),
            store,
            flight: SingleFlight::new(),
        }
    }

    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }

    pub fn invalidator(&self) -> &CacheInvalidator {
        &self.invalidator
    }

    /// Projection of `building_id` over `range`
    ///
    /// With `force_refresh` the cache is not consulted, but the recomputed
    /// result still replaces whatever entry was there. A failed cache write
    /// is logged and the fresh result is returned uncached.
    pub async fn projection(
        &self,
        building_id: &str,
        range: DateRange,
        group_by: GroupBy,
        force_refresh: bool,
    ) -> Result<ProjectionOutcome> {
        let key = CacheKey::new(range, group_by);

        if !force_refresh {
            if let Some(projection) = self.store.get(building_id, &key).await? {
                return Ok(ProjectionOutcome {
                    projection: Arc::new(projection),
                    cached: true,
                });
            }
        }

        let flight_key = format!("{}|{}", building_id, key);
        let projection = self
            .flight
            .run(&flight_key, || self.compute(building_id, &key))
            .await?;

        Ok(ProjectionOutcome {
            projection,
            cached: false,
        })
    }

    /// Drop every cached projection of the building, then recompute `range`
    pub async fn refresh(
        &self,
        building_id: &str,
        range: DateRange,
        group_by: GroupBy,
    ) -> Result<ProjectionOutcome> {
        self.invalidator
            .invalidate(building_id, "forced refresh")
            .await?;
        self.projection(building_id, range, group_by, true).await
    }

    async fn compute(&self, building_id: &str, key: &CacheKey) -> Result<Arc<Projection>> {
        let projection = self
            .builder
            .build(building_id, key.range(), key.group_by())
            .await?;

        if let Err(e) = self.store.set(building_id, key, &projection, None).await {
            tracing::warn!(building_id, key = %key, "Failed to cache projection: {}", e);
        }
        Ok(Arc::new(projection))
    }
}
