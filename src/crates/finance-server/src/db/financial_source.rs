//! Building records read from SQLite for the projection engine

use async_trait::async_trait;

use condo_projection::{BuildingInfo, FinancialSource, ProjectionError};

use crate::db::repositories::{BillRepository, BuildingRepository, ResidenceRepository};
use crate::db::DatabaseConnection;

/// [`FinancialSource`] over the buildings, bills and residences tables
#[derive(Clone)]
pub struct SqlFinancialSource {
    db: DatabaseConnection,
}

impl SqlFinancialSource {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn data_access(err: sqlx::Error) -> ProjectionError {
    ProjectionError::DataAccess(err.to_string())
}

#[async_trait]
impl FinancialSource for SqlFinancialSource {
    async fn building(&self, building_id: &str) -> condo_projection::Result<Option<BuildingInfo>> {
        let building = BuildingRepository::get_by_id(self.db.pool(), building_id)
            .await
            .map_err(data_access)?;
        Ok(building.map(|b| BuildingInfo {
            id: b.id,
            name: b.name,
        }))
    }

    async fn bills(&self, building_id: &str) -> condo_projection::Result<Vec<condo_projection::Bill>> {
        let rows = BillRepository::list_by_building(self.db.pool(), building_id)
            .await
            .map_err(data_access)?;
        Ok(rows.iter().filter_map(|row| row.to_engine()).collect())
    }

    async fn residences(
        &self,
        building_id: &str,
    ) -> condo_projection::Result<Vec<condo_projection::Residence>> {
        let rows = ResidenceRepository::list_by_building(self.db.pool(), building_id)
            .await
            .map_err(data_access)?;
        Ok(rows.iter().map(|row| row.to_engine()).collect())
    }
}
