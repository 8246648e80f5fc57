//! Building repository for database operations

use crate::db::connection::DatabasePool;
use crate::db::models::Building;
use chrono::Utc;

/// Building repository for managing building database operations
pub struct BuildingRepository;

impl BuildingRepository {
    /// Insert a new building
    pub async fn create(pool: &DatabasePool, building: &Building) -> Result<Building, sqlx::Error> {
        sqlx::query_as::<_, Building>(
            "INSERT INTO buildings (id, name, address, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&building.id)
        .bind(&building.name)
        .bind(&building.address)
        .bind(&building.created_at)
        .bind(&building.updated_at)
        .fetch_one(pool)
        .await
    }

    /// Get a building by ID
    pub async fn get_by_id(pool: &DatabasePool, id: &str) -> Result<Option<Building>, sqlx::Error> {
        sqlx::query_as::<_, Building>("SELECT * FROM buildings WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all buildings by name
    pub async fn list(pool: &DatabasePool) -> Result<Vec<Building>, sqlx::Error> {
        sqlx::query_as::<_, Building>("SELECT * FROM buildings ORDER BY name, id")
            .fetch_all(pool)
            .await
    }

    /// Update name and address, returning the stored row
    pub async fn update(
        pool: &DatabasePool,
        id: &str,
        name: &str,
        address: Option<&str>,
    ) -> Result<Option<Building>, sqlx::Error> {
        let now = Utc::now().to_rfc3339();
        sqlx::query_as::<_, Building>(
            "UPDATE buildings SET name = ?, address = ?, updated_at = ? WHERE id = ? RETURNING *",
        )
        .bind(name)
        .bind(address)
        .bind(&now)
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Delete a building with its bills and residences
    ///
    /// Returns whether a building was removed.
    pub async fn delete(pool: &DatabasePool, id: &str) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM bills WHERE building_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM residences WHERE building_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM buildings WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
