//! Request validation utilities

use chrono::NaiveDate;
use rust_decimal::Decimal;

use condo_projection::parse_amount;

use crate::api::error::{ApiError, ApiResult};

/// Years accepted anywhere a calendar year is requested
pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2200;

/// Largest amount accepted for a single bill figure or residence fee
pub fn max_amount() -> Decimal {
    Decimal::new(1_000_000_000, 0)
}

/// Validate a currency figure: parseable, non-negative and at most [`max_amount`]
pub fn validate_amount(raw: &str, field_name: &str) -> ApiResult<()> {
    match parse_amount(Some(raw)) {
        Some(amount) if !amount.is_sign_negative() && amount <= max_amount() => Ok(()),
        _ => Err(ApiError::ValidationError(format!(
            "{} must be an amount between 0 and {}, got {:?}",
            field_name,
            max_amount(),
            raw
        ))),
    }
}

/// Validate that a required string field is not empty
pub fn validate_not_empty(value: &str, field_name: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::ValidationError(format!("{} cannot be empty", field_name)));
    }
    Ok(())
}

/// Validate string length constraints
pub fn validate_string_length(value: &str, field_name: &str, min: usize, max: usize) -> ApiResult<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(ApiError::ValidationError(format!(
            "{} must be between {} and {} characters",
            field_name, min, max
        )));
    }
    Ok(())
}

/// Validate a projection year range
///
/// `start_year` must not come after `end_year`, and the range may cover at
/// most `max_span` calendar years.
pub fn validate_year_range(start_year: i32, end_year: i32, max_span: u32) -> ApiResult<()> {
    for year in [start_year, end_year] {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(ApiError::BadRequest(format!(
                "Year {} is outside {}..={}",
                year, MIN_YEAR, MAX_YEAR
            )));
        }
    }
    if start_year > end_year {
        return Err(ApiError::BadRequest(format!(
            "startYear ({}) must not be after endYear ({})",
            start_year, end_year
        )));
    }
    let span = (end_year - start_year + 1) as u32;
    if span > max_span {
        return Err(ApiError::BadRequest(format!(
            "Range covers {} years, at most {} allowed",
            span, max_span
        )));
    }
    Ok(())
}

/// Validate a `YYYY-MM-DD` date
pub fn parse_date(value: &str, field_name: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ApiError::ValidationError(format!("{} must be a YYYY-MM-DD date, got {:?}", field_name, value))
    })
}

/// Split a comma-separated id list, dropping blanks and repeats
pub fn parse_building_ids(raw: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for id in raw.split(',').map(str::trim).filter(|id| !id.is_empty()) {
        if !ids.iter().any(|seen| seen == id) {
            ids.push(id.to_string());
        }
    }
    ids
}
