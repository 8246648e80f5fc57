//! Residence endpoint handlers
//!
//! Every mutation invalidates the cached projections of the affected
//! building (both buildings when a residence moves) before reporting success.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use condo_projection::ChangeEvent;

use crate::api::{
    error::{ApiError, ApiResult},
    models::{CreateResidenceRequest, ResidenceResponse, UpdateResidenceRequest},
    response,
    routes::AppState,
};
use crate::db::repositories::{BuildingRepository, ResidenceRepository};
use crate::db::DatabasePool;

async fn require_building(pool: &DatabasePool, building_id: &str) -> ApiResult<()> {
    match BuildingRepository::get_by_id(pool, building_id).await? {
        Some(_) => Ok(()),
        None => Err(ApiError::NotFound(format!("Building not found: {}", building_id))),
    }
}

/// List the residences of a building
///
/// GET /api/v1/buildings/:id/residences
pub async fn list_residences(
    State(state): State<AppState>,
    Path(building_id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let pool = state.db.pool();
    require_building(pool, &building_id).await?;

    let residences = ResidenceRepository::list_by_building(pool, &building_id).await?;
    let responses: Vec<ResidenceResponse> =
        residences.into_iter().map(ResidenceResponse::from_db).collect();
    Ok(response::ok(responses))
}

/// Create a residence in a building
///
/// POST /api/v1/buildings/:id/residences
pub async fn create_residence(
    State(state): State<AppState>,
    Path(building_id): Path<String>,
    Json(req): Json<CreateResidenceRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    req.validate()?;

    let pool = state.db.pool();
    require_building(pool, &building_id).await?;

    let residence = req.into_row(Uuid::new_v4().to_string(), building_id.clone());
    let created = ResidenceRepository::create(pool, &residence).await?;
    state
        .invalidator()
        .notify(&building_id, ChangeEvent::ResidenceCreated)
        .await?;

    tracing::info!("Created residence {} in building {}", created.id, building_id);
    Ok(response::created(ResidenceResponse::from_db(created)))
}

/// Get a single residence
///
/// GET /api/v1/residences/:id
pub async fn get_residence(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let residence = ResidenceRepository::get_by_id(state.db.pool(), &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Residence not found: {}", id)))?;
    Ok(response::ok(ResidenceResponse::from_db(residence)))
}

/// Update a residence
///
/// PUT /api/v1/residences/:id
pub async fn update_residence(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateResidenceRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    if !req.has_updates() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }
    req.validate()?;

    let pool = state.db.pool();
    let mut residence = ResidenceRepository::get_by_id(pool, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Residence not found: {}", id)))?;
    let previous_building = residence.building_id.clone();

    req.apply(&mut residence);
    if residence.building_id != previous_building {
        require_building(pool, &residence.building_id).await?;
    }

    let updated = ResidenceRepository::update(pool, &residence)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Residence not found: {}", id)))?;

    let invalidator = state.invalidator();
    invalidator
        .notify(&previous_building, ChangeEvent::ResidenceUpdated)
        .await?;
    if updated.building_id != previous_building {
        invalidator
            .notify(&updated.building_id, ChangeEvent::ResidenceUpdated)
            .await?;
    }

    tracing::info!("Updated residence: {}", id);
    Ok(response::ok(ResidenceResponse::from_db(updated)))
}

/// Delete a residence
///
/// DELETE /api/v1/residences/:id
pub async fn delete_residence(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let pool = state.db.pool();
    let residence = ResidenceRepository::get_by_id(pool, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Residence not found: {}", id)))?;

    ResidenceRepository::delete(pool, &id).await?;
    state
        .invalidator()
        .notify(&residence.building_id, ChangeEvent::ResidenceDeleted)
        .await?;

    tracing::info!("Deleted residence: {}", id);
    Ok(response::no_content())
}
