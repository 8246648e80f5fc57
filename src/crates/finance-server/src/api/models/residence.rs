//! Residence API models and DTOs

use serde::{Deserialize, Serialize};

use crate::api::error::ApiResult;
use crate::api::middleware::validation::{validate_amount, validate_not_empty, validate_string_length};
use crate::db::models::Residence;

fn validate_fee(fee: Option<&str>) -> ApiResult<()> {
    match fee {
        None => Ok(()),
        Some(raw) => validate_amount(raw, "monthlyFee"),
    }
}

/// Request to create a residence in a building
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResidenceRequest {
    pub unit_number: String,
    pub monthly_fee: Option<String>,
    /// Defaults to active
    pub is_active: Option<bool>,
}

impl CreateResidenceRequest {
    pub fn validate(&self) -> ApiResult<()> {
        validate_not_empty(&self.unit_number, "unitNumber")?;
        validate_string_length(&self.unit_number, "unitNumber", 1, 50)?;
        validate_fee(self.monthly_fee.as_deref())
    }

    pub fn into_row(self, id: String, building_id: String) -> Residence {
        let mut residence = Residence::new(id, building_id, self.unit_number);
        residence.monthly_fee = self.monthly_fee;
        residence.is_active = self.is_active.unwrap_or(true);
        residence
    }
}

/// Request to update a residence, possibly moving it to another building
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResidenceRequest {
    pub building_id: Option<String>,
    pub unit_number: Option<String>,
    pub monthly_fee: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateResidenceRequest {
    /// Check if any fields are being updated
    pub fn has_updates(&self) -> bool {
        self.building_id.is_some()
            || self.unit_number.is_some()
            || self.monthly_fee.is_some()
            || self.is_active.is_some()
    }

    pub fn validate(&self) -> ApiResult<()> {
        if let Some(unit) = &self.unit_number {
            validate_not_empty(unit, "unitNumber")?;
            validate_string_length(unit, "unitNumber", 1, 50)?;
        }
        validate_fee(self.monthly_fee.as_deref())
    }

    pub fn apply(self, residence: &mut Residence) {
        if let Some(building_id) = self.building_id {
            residence.building_id = building_id;
        }
        if let Some(unit) = self.unit_number {
            residence.unit_number = unit;
        }
        if let Some(fee) = self.monthly_fee {
            residence.monthly_fee = Some(fee);
        }
        if let Some(active) = self.is_active {
            residence.is_active = active;
        }
    }
}

/// Residence response for API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidenceResponse {
    pub id: String,
    pub building_id: String,
    pub unit_number: String,
    pub monthly_fee: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl ResidenceResponse {
    pub fn from_db(residence: Residence) -> Self {
        Self {
            id: residence.id,
            building_id: residence.building_id,
            unit_number: residence.unit_number,
            monthly_fee: residence.monthly_fee,
            is_active: residence.is_active,
            created_at: residence.created_at,
            updated_at: residence.updated_at,
        }
    }
}
