//! Data-access collaborators of the projection builder
//!
//! [`FinancialSource`] is the seam between the engine and whatever stores
//! buildings, bills and residences. [`InMemoryFinancialSource`] backs tests
//! and local tooling; the server crate provides the SQLite implementation.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{ProjectionError, Result};
use crate::model::{Bill, Residence};

/// Minimal building information the engine needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingInfo {
    pub id: String,
    pub name: String,
}

/// Reads the records a projection is built from
#[async_trait]
pub trait FinancialSource: Send + Sync {
    /// Look up a building; `Ok(None)` when it does not exist
    async fn building(&self, building_id: &str) -> Result<Option<BuildingInfo>>;

    /// Every bill owned by the building
    async fn bills(&self, building_id: &str) -> Result<Vec<Bill>>;

    /// Every residence owned by the building
    async fn residences(&self, building_id: &str) -> Result<Vec<Residence>>;
}

#[derive(Debug, Default)]
struct BuildingRecords {
    info: Option<BuildingInfo>,
    bills: Vec<Bill>,
    residences: Vec<Residence>,
}

/// Thread-safe in-memory [`FinancialSource`]
#[derive(Debug, Default)]
pub struct InMemoryFinancialSource {
    buildings: RwLock<HashMap<String, BuildingRecords>>,
    failing: RwLock<HashSet<String>>,
    loads: AtomicUsize,
}

impl InMemoryFinancialSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_building(&self, id: impl Into<String>, name: impl Into<String>) {
        let id = id.into();
        let info = BuildingInfo {
            id: id.clone(),
            name: name.into(),
        };
        self.buildings.write().entry(id).or_default().info = Some(info);
    }

    pub fn remove_building(&self, id: &str) {
        self.buildings.write().remove(id);
    }

    pub fn add_bill(&self, bill: Bill) {
        self.buildings
            .write()
            .entry(bill.building_id.clone())
            .or_default()
            .bills
            .push(bill);
    }

    pub fn add_residence(&self, residence: Residence) {
        self.buildings
            .write()
            .entry(residence.building_id.clone())
            .or_default()
            .residences
            .push(residence);
    }

    /// Make every read for `building_id` fail with a data-access error
    pub fn fail_building(&self, building_id: impl Into<String>) {
        self.failing.write().insert(building_id.into());
    }

    /// Number of building lookups served so far
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    fn check(&self, building_id: &str) -> Result<()> {
        if self.failing.read().contains(building_id) {
            return Err(ProjectionError::DataAccess(format!(
                "source unavailable for building {}",
                building_id
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl FinancialSource for InMemoryFinancialSource {
    async fn building(&self, building_id: &str) -> Result<Option<BuildingInfo>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.check(building_id)?;
        Ok(self
            .buildings
            .read()
            .get(building_id)
            .and_then(|records| records.info.clone()))
    }

    async fn bills(&self, building_id: &str) -> Result<Vec<Bill>> {
        self.check(building_id)?;
        Ok(self
            .buildings
            .read()
            .get(building_id)
            .map(|records| records.bills.clone())
            .unwrap_or_default())
    }

    async fn residences(&self, building_id: &str) -> Result<Vec<Residence>> {
        self.check(building_id)?;
        Ok(self
            .buildings
            .read()
            .get(building_id)
            .map(|records| records.residences.clone())
            .unwrap_or_default())
    }
}
