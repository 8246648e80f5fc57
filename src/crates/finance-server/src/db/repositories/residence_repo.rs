//! Residence repository for database operations

use crate::db::connection::DatabasePool;
use crate::db::models::Residence;
use chrono::Utc;

/// Residence repository for managing residence database operations
pub struct ResidenceRepository;

impl ResidenceRepository {
    /// Insert a new residence
    pub async fn create(pool: &DatabasePool, residence: &Residence) -> Result<Residence, sqlx::Error> {
        sqlx::query_as::<_, Residence>(
            "INSERT INTO residences (id, building_id, unit_number, monthly_fee, is_active, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&residence.id)
        .bind(&residence.building_id)
        .bind(&residence.unit_number)
        .bind(&residence.monthly_fee)
        .bind(residence.is_active)
        .bind(&residence.created_at)
        .bind(&residence.updated_at)
        .fetch_one(pool)
        .await
    }

    /// Get a residence by ID
    pub async fn get_by_id(pool: &DatabasePool, id: &str) -> Result<Option<Residence>, sqlx::Error> {
        sqlx::query_as::<_, Residence>("SELECT * FROM residences WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the residences of a building by unit number
    pub async fn list_by_building(
        pool: &DatabasePool,
        building_id: &str,
    ) -> Result<Vec<Residence>, sqlx::Error> {
        sqlx::query_as::<_, Residence>(
            "SELECT * FROM residences WHERE building_id = ? ORDER BY unit_number, id",
        )
        .bind(building_id)
        .fetch_all(pool)
        .await
    }

    /// Replace every editable column of a residence
    pub async fn update(
        pool: &DatabasePool,
        residence: &Residence,
    ) -> Result<Option<Residence>, sqlx::Error> {
        let now = Utc::now().to_rfc3339();
        sqlx::query_as::<_, Residence>(
            "UPDATE residences
             SET building_id = ?, unit_number = ?, monthly_fee = ?, is_active = ?, updated_at = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(&residence.building_id)
        .bind(&residence.unit_number)
        .bind(&residence.monthly_fee)
        .bind(residence.is_active)
        .bind(&now)
        .bind(&residence.id)
        .fetch_optional(pool)
        .await
    }

    /// Delete a residence, returning whether it existed
    pub async fn delete(pool: &DatabasePool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM residences WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
