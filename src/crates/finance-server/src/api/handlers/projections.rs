//! Single-building projection endpoint handlers

use axum::extract::{Path, Query, State};
use chrono::Datelike;

use condo_projection::{DateRange, GroupBy};

use crate::api::{
    error::{ApiError, ApiResult},
    middleware::validation::validate_year_range,
    models::{CacheInvalidationResponse, ProjectionQuery, ProjectionResponse, RefreshQuery},
    response,
    routes::AppState,
};

pub(crate) fn current_year() -> i32 {
    chrono::Utc::now().year()
}

fn parse_group_by(raw: Option<&str>) -> ApiResult<GroupBy> {
    raw.map(str::parse::<GroupBy>)
        .transpose()
        .map(Option::unwrap_or_default)
        .map_err(ApiError::BadRequest)
}

fn year_range(state: &AppState, start_year: i32, end_year: i32) -> ApiResult<DateRange> {
    validate_year_range(start_year, end_year, state.limits.max_year_span)?;
    DateRange::years(start_year, end_year)
        .ok_or_else(|| ApiError::BadRequest(format!("Years {}..{} are out of range", start_year, end_year)))
}

/// Projection of one building
///
/// GET /api/v1/buildings/:id/financial-projection
pub async fn get_projection(
    State(state): State<AppState>,
    Path(building_id): Path<String>,
    Query(query): Query<ProjectionQuery>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let (Some(start_year), Some(end_year)) = (query.start_year, query.end_year) else {
        return Err(ApiError::BadRequest(
            "startYear and endYear are required".to_string(),
        ));
    };
    let range = year_range(&state, start_year, end_year)?;
    let group_by = parse_group_by(query.group_by.as_deref())?;
    let force_refresh = query.force_refresh.unwrap_or(false);

    let outcome = state
        .projections
        .projection(&building_id, range, group_by, force_refresh)
        .await?;

    tracing::debug!(
        building_id = %building_id,
        cached = outcome.cached,
        "Served projection {}..{}",
        start_year,
        end_year
    );
    Ok(response::ok(ProjectionResponse::new(
        &building_id,
        start_year,
        end_year,
        group_by,
        outcome,
    )))
}

/// Drop the building's cached projections and recompute one range
///
/// POST /api/v1/buildings/:id/financial-projection/refresh
pub async fn refresh_projection(
    State(state): State<AppState>,
    Path(building_id): Path<String>,
    Query(query): Query<RefreshQuery>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let start_year = query.start_year.unwrap_or_else(current_year);
    let end_year = query.end_year.unwrap_or(start_year);
    let range = year_range(&state, start_year, end_year)?;
    let group_by = parse_group_by(query.group_by.as_deref())?;

    let outcome = state.projections.refresh(&building_id, range, group_by).await?;

    tracing::info!("Refreshed projection cache for building {}", building_id);
    Ok(response::ok(ProjectionResponse::new(
        &building_id,
        start_year,
        end_year,
        group_by,
        outcome,
    )))
}

/// Invalidate every cached projection of a building
///
/// DELETE /api/v1/buildings/:id/financial-projection/cache
pub async fn invalidate_projection_cache(
    State(state): State<AppState>,
    Path(building_id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let removed = state
        .invalidator()
        .invalidate(&building_id, "manual invalidation")
        .await?;

    Ok(response::ok(CacheInvalidationResponse {
        building_id,
        removed,
    }))
}
