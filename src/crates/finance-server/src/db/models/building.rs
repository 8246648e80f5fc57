//! Building model for database persistence

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A managed condominium building
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Building {
    /// Unique building identifier (UUID string)
    pub id: String,

    pub name: String,

    /// Civic address
    pub address: Option<String>,

    /// Creation timestamp (RFC3339 string)
    pub created_at: String,

    /// Last update timestamp (RFC3339 string)
    pub updated_at: String,
}

impl Building {
    pub fn new(id: String, name: String, address: Option<String>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id,
            name,
            address,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}
