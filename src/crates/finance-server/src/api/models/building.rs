//! Building API models and DTOs

use serde::{Deserialize, Serialize};

use crate::api::error::ApiResult;
use crate::api::middleware::validation::{validate_not_empty, validate_string_length};
use crate::db::models::Building;

/// Request to create a new building
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBuildingRequest {
    pub name: String,
    pub address: Option<String>,
}

impl CreateBuildingRequest {
    pub fn validate(&self) -> ApiResult<()> {
        validate_not_empty(&self.name, "name")?;
        validate_string_length(&self.name, "name", 1, 255)
    }
}

/// Request to update an existing building
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBuildingRequest {
    pub name: Option<String>,
    pub address: Option<String>,
}

impl UpdateBuildingRequest {
    /// Check if any fields are being updated
    pub fn has_updates(&self) -> bool {
        self.name.is_some() || self.address.is_some()
    }

    pub fn validate(&self) -> ApiResult<()> {
        if let Some(name) = &self.name {
            validate_not_empty(name, "name")?;
            validate_string_length(name, "name", 1, 255)?;
        }
        Ok(())
    }
}

/// Building response for API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingResponse {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl BuildingResponse {
    pub fn from_db(building: Building) -> Self {
        Self {
            id: building.id,
            name: building.name,
            address: building.address,
            created_at: building.created_at,
            updated_at: building.updated_at,
        }
    }
}
