//! Projection, summary and cache administration DTOs

use serde::{Deserialize, Serialize};

use condo_projection::{CacheStats, FinancialRecord, GroupBy, ProjectionOutcome, ProjectionSummary};

/// Query of GET /api/v1/buildings/:id/financial-projection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionQuery {
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    /// monthly (default) or yearly
    pub group_by: Option<String>,
    pub force_refresh: Option<bool>,
}

/// Query of POST /api/v1/buildings/:id/financial-projection/refresh
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshQuery {
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub group_by: Option<String>,
}

/// Query of GET /api/v1/financial-projection/summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryQuery {
    /// Comma-separated building identifiers
    pub building_ids: Option<String>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionMetadata {
    pub building_id: String,
    pub start_year: i32,
    pub end_year: i32,
    pub group_by: GroupBy,
    /// Whether the projection was served from the cache
    pub cached: bool,
    pub generated_at: String,
}

/// Projection response for API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResponse {
    pub records: Vec<FinancialRecord>,
    pub summary: ProjectionSummary,
    pub metadata: ProjectionMetadata,
}

impl ProjectionResponse {
    pub fn new(
        building_id: &str,
        start_year: i32,
        end_year: i32,
        group_by: GroupBy,
        outcome: ProjectionOutcome,
    ) -> Self {
        Self {
            records: outcome.projection.records.clone(),
            summary: outcome.projection.summary.clone(),
            metadata: ProjectionMetadata {
                building_id: building_id.to_string(),
                start_year,
                end_year,
                group_by,
                cached: outcome.cached,
                generated_at: chrono::Utc::now().to_rfc3339(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheInvalidationResponse {
    pub building_id: String,
    /// Number of cache entries removed
    pub removed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheSweepResponse {
    pub removed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    pub ttl_seconds: u64,
}
