//! Projection cache row

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use condo_projection::{CacheEntry, GroupBy};

/// One cached projection payload
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CacheEntryRow {
    pub id: i64,
    pub building_id: String,
    pub cache_key: String,
    pub start_date: String,
    pub end_date: String,
    pub group_by: String,
    /// Serialized projection (JSON)
    pub payload: String,
    /// RFC3339 UTC, millisecond precision
    pub created_at: String,
    /// RFC3339 UTC, millisecond precision
    pub expires_at: String,
}

/// Fixed-width RFC3339 rendering so stored timestamps compare as text
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|at| at.with_timezone(&Utc))
}

impl CacheEntryRow {
    /// Row for an engine entry; `id` is assigned by the database
    pub fn from_entry(entry: &CacheEntry) -> Self {
        Self {
            id: 0,
            building_id: entry.building_id.clone(),
            cache_key: entry.cache_key.clone(),
            start_date: entry.start_date.to_string(),
            end_date: entry.end_date.to_string(),
            group_by: entry.group_by.as_str().to_string(),
            payload: entry.payload.clone(),
            created_at: timestamp(entry.created_at),
            expires_at: timestamp(entry.expires_at),
        }
    }

    /// Engine entry for this row, `None` when a column no longer parses
    pub fn into_entry(self) -> Option<CacheEntry> {
        Some(CacheEntry {
            start_date: NaiveDate::parse_from_str(&self.start_date, "%Y-%m-%d").ok()?,
            end_date: NaiveDate::parse_from_str(&self.end_date, "%Y-%m-%d").ok()?,
            group_by: self.group_by.parse::<GroupBy>().ok()?,
            created_at: parse_timestamp(&self.created_at)?,
            expires_at: parse_timestamp(&self.expires_at)?,
            building_id: self.building_id,
            cache_key: self.cache_key,
            payload: self.payload,
        })
    }
}
