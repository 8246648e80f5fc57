//! Residence model for database persistence

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A unit of a building paying a monthly condo fee
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Residence {
    /// Unique residence identifier (UUID string)
    pub id: String,

    pub building_id: String,

    pub unit_number: String,

    /// Monthly fee as entered; may be missing or malformed
    pub monthly_fee: Option<String>,

    pub is_active: bool,

    pub created_at: String,

    pub updated_at: String,
}

impl Residence {
    pub fn new(id: String, building_id: String, unit_number: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id,
            building_id,
            unit_number,
            monthly_fee: None,
            is_active: true,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Engine view of this residence
    pub fn to_engine(&self) -> condo_projection::Residence {
        condo_projection::Residence::new(
            self.id.clone(),
            self.building_id.clone(),
            self.monthly_fee.as_deref(),
            self.is_active,
        )
    }
}
