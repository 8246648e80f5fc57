//! API data transfer objects (DTOs) and response models
//!
//! Provides request/response structures for API endpoints with validation.

pub mod bill;
pub mod building;
pub mod projection;
pub mod residence;

pub use bill::{BillResponse, CreateBillRequest, UpdateBillRequest};
pub use building::{BuildingResponse, CreateBuildingRequest, UpdateBuildingRequest};
pub use projection::{
    CacheInvalidationResponse, CacheStatsResponse, CacheSweepResponse, ProjectionMetadata,
    ProjectionQuery, ProjectionResponse, RefreshQuery, SummaryQuery,
};
pub use residence::{CreateResidenceRequest, ResidenceResponse, UpdateResidenceRequest};

/// System health response
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    /// Overall status
    pub status: String,

    /// Database connection status
    pub database: String,

    /// API version
    pub version: String,

    /// Current timestamp
    pub timestamp: String,
}

impl HealthResponse {
    pub fn new(status: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            database: database.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
