//! Bill API models and DTOs

use serde::{Deserialize, Serialize};

use condo_projection::Recurrence;

use crate::api::error::{ApiError, ApiResult};
use crate::api::middleware::validation::{
    parse_date, validate_amount, validate_not_empty, validate_string_length,
};
use crate::db::models::Bill;

/// Request to create a bill for a building
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBillRequest {
    pub title: Option<String>,
    pub category: String,
    /// Amount per occurrence
    pub total_amount: Option<String>,
    /// Per-occurrence amounts, used when no total is given
    pub costs: Option<Vec<String>>,
    /// monthly, quarterly, yearly, weekly or custom
    pub recurrence: String,
    /// YYYY-MM-DD dates of a custom schedule
    pub custom_dates: Option<Vec<String>>,
    pub start_date: String,
    pub end_date: Option<String>,
}

impl CreateBillRequest {
    pub fn validate(&self) -> ApiResult<()> {
        if let Some(title) = &self.title {
            validate_string_length(title, "title", 0, 255)?;
        }
        if let Some(costs) = &self.costs {
            for cost in costs {
                validate_amount(cost, "costs")?;
            }
        }
        validate_schedule(
            &self.category,
            self.total_amount.as_deref(),
            &self.recurrence,
            self.custom_dates.as_deref().unwrap_or_default(),
            &self.start_date,
            self.end_date.as_deref(),
        )
    }

    pub fn into_row(self, id: String, building_id: String) -> ApiResult<Bill> {
        let mut bill = Bill::new(
            id,
            building_id,
            self.category.trim().to_string(),
            self.recurrence.trim().to_ascii_lowercase(),
            self.start_date.trim().to_string(),
        );
        bill.title = self.title;
        bill.total_amount = self.total_amount;
        bill.costs = self.costs.map(|c| serde_json::to_string(&c)).transpose()?;
        bill.custom_dates = self.custom_dates.map(|d| serde_json::to_string(&d)).transpose()?;
        bill.end_date = self.end_date;
        Ok(bill)
    }
}

/// Request to update a bill, possibly moving it to another building
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBillRequest {
    pub building_id: Option<String>,
    pub title: Option<String>,
    pub category: Option<String>,
    pub total_amount: Option<String>,
    pub costs: Option<Vec<String>>,
    pub recurrence: Option<String>,
    pub custom_dates: Option<Vec<String>>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl UpdateBillRequest {
    /// Check if any fields are being updated
    pub fn has_updates(&self) -> bool {
        self.building_id.is_some()
            || self.title.is_some()
            || self.category.is_some()
            || self.total_amount.is_some()
            || self.costs.is_some()
            || self.recurrence.is_some()
            || self.custom_dates.is_some()
            || self.start_date.is_some()
            || self.end_date.is_some()
    }

    /// Apply the update and validate the resulting bill
    pub fn apply(self, bill: &mut Bill) -> ApiResult<()> {
        if let Some(building_id) = self.building_id {
            bill.building_id = building_id;
        }
        if let Some(title) = self.title {
            validate_string_length(&title, "title", 0, 255)?;
            bill.title = Some(title);
        }
        if let Some(category) = self.category {
            bill.category = category.trim().to_string();
        }
        if let Some(total) = self.total_amount {
            bill.total_amount = Some(total);
        }
        if let Some(costs) = self.costs {
            for cost in &costs {
                validate_amount(cost, "costs")?;
            }
            bill.costs = Some(serde_json::to_string(&costs)?);
        }
        if let Some(recurrence) = self.recurrence {
            bill.recurrence = recurrence.trim().to_ascii_lowercase();
        }
        if let Some(dates) = self.custom_dates {
            bill.custom_dates = Some(serde_json::to_string(&dates)?);
        }
        if let Some(start) = self.start_date {
            bill.start_date = start.trim().to_string();
        }
        if let Some(end) = self.end_date {
            bill.end_date = Some(end);
        }

        let custom_dates = decode_list(bill.custom_dates.as_deref());
        validate_schedule(
            &bill.category,
            bill.total_amount.as_deref(),
            &bill.recurrence,
            &custom_dates,
            &bill.start_date,
            bill.end_date.as_deref(),
        )
    }
}

fn validate_schedule(
    category: &str,
    total_amount: Option<&str>,
    recurrence: &str,
    custom_dates: &[String],
    start_date: &str,
    end_date: Option<&str>,
) -> ApiResult<()> {
    validate_not_empty(category, "category")?;
    validate_string_length(category, "category", 1, 100)?;
    if let Some(total) = total_amount {
        validate_amount(total, "totalAmount")?;
    }

    let recurrence = Recurrence::from(recurrence);
    if let Recurrence::Other(kind) = &recurrence {
        return Err(ApiError::ValidationError(format!(
            "Invalid recurrence {:?}. Must be: monthly, quarterly, yearly, weekly, or custom",
            kind
        )));
    }
    if recurrence == Recurrence::Custom && custom_dates.is_empty() {
        return Err(ApiError::ValidationError(
            "customDates is required for a custom recurrence".to_string(),
        ));
    }
    for date in custom_dates {
        parse_date(date, "customDates")?;
    }

    let start = parse_date(start_date, "startDate")?;
    if let Some(end) = end_date {
        let end = parse_date(end, "endDate")?;
        if end < start {
            return Err(ApiError::ValidationError(
                "endDate must not be before startDate".to_string(),
            ));
        }
    }
    Ok(())
}

fn decode_list(raw: Option<&str>) -> Vec<String> {
    raw.and_then(|raw| serde_json::from_str(raw).ok())
        .unwrap_or_default()
}

/// Bill response for API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillResponse {
    pub id: String,
    pub building_id: String,
    pub title: Option<String>,
    pub category: String,
    pub total_amount: Option<String>,
    pub costs: Vec<String>,
    pub recurrence: String,
    pub custom_dates: Vec<String>,
    pub start_date: String,
    pub end_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl BillResponse {
    pub fn from_db(bill: Bill) -> Self {
        Self {
            costs: decode_list(bill.costs.as_deref()),
            custom_dates: decode_list(bill.custom_dates.as_deref()),
            id: bill.id,
            building_id: bill.building_id,
            title: bill.title,
            category: bill.category,
            total_amount: bill.total_amount,
            recurrence: bill.recurrence,
            start_date: bill.start_date,
            end_date: bill.end_date,
            created_at: bill.created_at,
            updated_at: bill.updated_at,
        }
    }
}
