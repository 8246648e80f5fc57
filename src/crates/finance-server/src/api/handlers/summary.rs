//! Multi-building summary endpoint handler

use axum::extract::{Query, State};

use crate::api::{
    error::ApiResult,
    handlers::projections::current_year,
    middleware::validation::{parse_building_ids, validate_year_range},
    models::SummaryQuery,
    response,
    routes::AppState,
};

/// One-year summary over several buildings
///
/// GET /api/v1/financial-projection/summary?buildingIds=a,b&year=2024
///
/// Buildings that fail are listed under `failed`; the request itself only
/// fails on invalid input.
pub async fn financial_summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let building_ids = parse_building_ids(query.building_ids.as_deref().unwrap_or_default());
    let year = query.year.unwrap_or_else(current_year);
    validate_year_range(year, year, 1)?;

    let summary = state.summaries.summarize(&building_ids, year).await?;

    tracing::info!(
        succeeded = summary.succeeded_count,
        failed = summary.failed_count,
        "Built {} summary",
        year
    );
    Ok(response::ok(summary))
}
