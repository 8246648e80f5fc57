//! Bill repository for database operations

use crate::db::connection::DatabasePool;
use crate::db::models::Bill;
use chrono::Utc;

/// Bill repository for managing bill database operations
pub struct BillRepository;

impl BillRepository {
    /// Insert a new bill
    pub async fn create(pool: &DatabasePool, bill: &Bill) -> Result<Bill, sqlx::Error> {
        sqlx::query_as::<_, Bill>(
            "INSERT INTO bills (id, building_id, title, category, total_amount, costs, recurrence,
                                custom_dates, start_date, end_date, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&bill.id)
        .bind(&bill.building_id)
        .bind(&bill.title)
        .bind(&bill.category)
        .bind(&bill.total_amount)
        .bind(&bill.costs)
        .bind(&bill.recurrence)
        .bind(&bill.custom_dates)
        .bind(&bill.start_date)
        .bind(&bill.end_date)
        .bind(&bill.created_at)
        .bind(&bill.updated_at)
        .fetch_one(pool)
        .await
    }

    /// Get a bill by ID
    pub async fn get_by_id(pool: &DatabasePool, id: &str) -> Result<Option<Bill>, sqlx::Error> {
        sqlx::query_as::<_, Bill>("SELECT * FROM bills WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the bills of a building
    pub async fn list_by_building(
        pool: &DatabasePool,
        building_id: &str,
    ) -> Result<Vec<Bill>, sqlx::Error> {
        sqlx::query_as::<_, Bill>(
            "SELECT * FROM bills WHERE building_id = ? ORDER BY start_date, created_at, id",
        )
        .bind(building_id)
        .fetch_all(pool)
        .await
    }

    /// Replace every editable column of a bill
    pub async fn update(pool: &DatabasePool, bill: &Bill) -> Result<Option<Bill>, sqlx::Error> {
        let now = Utc::now().to_rfc3339();
        sqlx::query_as::<_, Bill>(
            "UPDATE bills
             SET building_id = ?, title = ?, category = ?, total_amount = ?, costs = ?,
                 recurrence = ?, custom_dates = ?, start_date = ?, end_date = ?, updated_at = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(&bill.building_id)
        .bind(&bill.title)
        .bind(&bill.category)
        .bind(&bill.total_amount)
        .bind(&bill.costs)
        .bind(&bill.recurrence)
        .bind(&bill.custom_dates)
        .bind(&bill.start_date)
        .bind(&bill.end_date)
        .bind(&now)
        .bind(&bill.id)
        .fetch_optional(pool)
        .await
    }

    /// Delete a bill, returning whether it existed
    pub async fn delete(pool: &DatabasePool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM bills WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count the bills of a building
    pub async fn count_by_building(pool: &DatabasePool, building_id: &str) -> Result<i64, sqlx::Error> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bills WHERE building_id = ?")
            .bind(building_id)
            .fetch_one(pool)
            .await?;
        Ok(result.0)
    }
}
