//! Building endpoint handlers
//!
//! Every mutation invalidates the building's cached projections before
//! reporting success.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use condo_projection::ChangeEvent;

use crate::api::{
    error::{ApiError, ApiResult},
    models::{BuildingResponse, CreateBuildingRequest, UpdateBuildingRequest},
    response,
    routes::AppState,
};
use crate::db::models::Building;
use crate::db::repositories::BuildingRepository;

/// Create a building
///
/// POST /api/v1/buildings
pub async fn create_building(
    State(state): State<AppState>,
    Json(req): Json<CreateBuildingRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    req.validate()?;

    let building = Building::new(
        Uuid::new_v4().to_string(),
        req.name.trim().to_string(),
        req.address,
    );
    let created = BuildingRepository::create(state.db.pool(), &building).await?;
    state
        .invalidator()
        .notify(&created.id, ChangeEvent::BuildingCreated)
        .await?;

    tracing::info!("Created building: {}", created.id);
    Ok(response::created(BuildingResponse::from_db(created)))
}

/// List all buildings
///
/// GET /api/v1/buildings
pub async fn list_buildings(State(state): State<AppState>) -> ApiResult<impl axum::response::IntoResponse> {
    let buildings = BuildingRepository::list(state.db.pool()).await?;
    let responses: Vec<BuildingResponse> = buildings.into_iter().map(BuildingResponse::from_db).collect();
    Ok(response::ok(responses))
}

/// Get a single building
///
/// GET /api/v1/buildings/:id
pub async fn get_building(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let building = BuildingRepository::get_by_id(state.db.pool(), &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Building not found: {}", id)))?;
    Ok(response::ok(BuildingResponse::from_db(building)))
}

/// Update a building
///
/// PUT /api/v1/buildings/:id
pub async fn update_building(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateBuildingRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    if !req.has_updates() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }
    req.validate()?;

    let pool = state.db.pool();
    let current = BuildingRepository::get_by_id(pool, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Building not found: {}", id)))?;

    let name = req.name.map(|n| n.trim().to_string()).unwrap_or(current.name);
    let address = req.address.or(current.address);
    let updated = BuildingRepository::update(pool, &id, &name, address.as_deref())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Building not found: {}", id)))?;
    state
        .invalidator()
        .notify(&id, ChangeEvent::BuildingUpdated)
        .await?;

    tracing::info!("Updated building: {}", id);
    Ok(response::ok(BuildingResponse::from_db(updated)))
}

/// Delete a building with its bills and residences
///
/// DELETE /api/v1/buildings/:id
pub async fn delete_building(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    if !BuildingRepository::delete(state.db.pool(), &id).await? {
        return Err(ApiError::NotFound(format!("Building not found: {}", id)));
    }
    state
        .invalidator()
        .notify(&id, ChangeEvent::BuildingDeleted)
        .await?;

    tracing::info!("Deleted building: {}", id);
    Ok(response::no_content())
}
