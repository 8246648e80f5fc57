//! Bill endpoint handlers
//!
//! Every mutation invalidates the cached projections of the affected
//! building (both buildings when a bill moves) before reporting success.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use condo_projection::ChangeEvent;

use crate::api::{
    error::{ApiError, ApiResult},
    models::{BillResponse, CreateBillRequest, UpdateBillRequest},
    response,
    routes::AppState,
};
use crate::db::repositories::{BillRepository, BuildingRepository};
use crate::db::DatabasePool;

async fn require_building(pool: &DatabasePool, building_id: &str) -> ApiResult<()> {
    BuildingRepository::get_by_id(pool, building_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| ApiError::NotFound(format!("Building not found: {}", building_id)))
}

/// List the bills of a building
///
/// GET /api/v1/buildings/:id/bills
pub async fn list_bills(
    State(state): State<AppState>,
    Path(building_id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let pool = state.db.pool();
    require_building(pool, &building_id).await?;

    let bills = BillRepository::list_by_building(pool, &building_id).await?;
    let responses: Vec<BillResponse> = bills.into_iter().map(BillResponse::from_db).collect();
    Ok(response::ok(responses))
}

/// Create a bill for a building
///
/// POST /api/v1/buildings/:id/bills
pub async fn create_bill(
    State(state): State<AppState>,
    Path(building_id): Path<String>,
    Json(req): Json<CreateBillRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    req.validate()?;

    let pool = state.db.pool();
    require_building(pool, &building_id).await?;

    let bill = req.into_row(Uuid::new_v4().to_string(), building_id.clone())?;
    let created = BillRepository::create(pool, &bill).await?;
    state
        .invalidator()
        .notify(&building_id, ChangeEvent::BillCreated)
        .await?;

    tracing::info!("Created bill {} for building {}", created.id, building_id);
    Ok(response::created(BillResponse::from_db(created)))
}

/// Get a single bill
///
/// GET /api/v1/bills/:id
pub async fn get_bill(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let bill = BillRepository::get_by_id(state.db.pool(), &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Bill not found: {}", id)))?;
    Ok(response::ok(BillResponse::from_db(bill)))
}

/// Update a bill
///
/// PUT /api/v1/bills/:id
pub async fn update_bill(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateBillRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    if !req.has_updates() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }

    let pool = state.db.pool();
    let mut bill = BillRepository::get_by_id(pool, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Bill not found: {}", id)))?;
    let previous_building = bill.building_id.clone();

    req.apply(&mut bill)?;
    if bill.building_id != previous_building {
        require_building(pool, &bill.building_id).await?;
    }

    let updated = BillRepository::update(pool, &bill)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Bill not found: {}", id)))?;

    let invalidator = state.invalidator();
    invalidator
        .notify(&previous_building, ChangeEvent::BillUpdated)
        .await?;
    if updated.building_id != previous_building {
        invalidator
            .notify(&updated.building_id, ChangeEvent::BillUpdated)
            .await?;
    }

    tracing::info!("Updated bill: {}", id);
    Ok(response::ok(BillResponse::from_db(updated)))
}

/// Delete a bill
///
/// DELETE /api/v1/bills/:id
pub async fn delete_bill(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let pool = state.db.pool();
    let bill = BillRepository::get_by_id(pool, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Bill not found: {}", id)))?;

    BillRepository::delete(pool, &id).await?;
    state
        .invalidator()
        .notify(&bill.building_id, ChangeEvent::BillDeleted)
        .await?;

    tracing::info!("Deleted bill: {}", id);
    Ok(response::no_content())
}
