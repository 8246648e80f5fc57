//! Bill model for database persistence

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use condo_projection::Recurrence;

/// A recurring or one-off charge of a building
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Bill {
    /// Unique bill identifier (UUID string)
    pub id: String,

    pub building_id: String,

    pub title: Option<String>,

    /// Free-form expense category (utilities, insurance, ...)
    pub category: String,

    /// Amount per occurrence as entered
    pub total_amount: Option<String>,

    /// Per-occurrence amounts (JSON array string)
    pub costs: Option<String>,

    /// monthly, quarterly, yearly, weekly or custom
    pub recurrence: String,

    /// Dates of a custom schedule (JSON array string of YYYY-MM-DD)
    pub custom_dates: Option<String>,

    /// First day the bill applies (YYYY-MM-DD)
    pub start_date: String,

    /// Last day the bill applies (YYYY-MM-DD, optional)
    pub end_date: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

impl Bill {
    pub fn new(
        id: String,
        building_id: String,
        category: String,
        recurrence: String,
        start_date: String,
    ) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id,
            building_id,
            title: None,
            category,
            total_amount: None,
            costs: None,
            recurrence,
            custom_dates: None,
            start_date,
            end_date: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Engine view of this bill
    ///
    /// Malformed JSON lists and unparseable custom dates are dropped. A bill
    /// whose start or end date does not parse cannot be scheduled and yields
    /// `None`.
    pub fn to_engine(&self) -> Option<condo_projection::Bill> {
        let Some(start_date) = parse_date(&self.start_date) else {
            tracing::warn!(bill_id = %self.id, start_date = %self.start_date, "Skipping bill with unreadable start date");
            return None;
        };
        let end_date = match self.end_date.as_deref() {
            None => None,
            Some(raw) if raw.trim().is_empty() => None,
            Some(raw) => match parse_date(raw) {
                Some(end) => Some(end),
                None => {
                    tracing::warn!(bill_id = %self.id, end_date = %raw, "Skipping bill with unreadable end date");
                    return None;
                }
            },
        };

        let costs: Vec<String> = decode_list(&self.id, self.costs.as_deref());
        let custom_dates = decode_list::<String>(&self.id, self.custom_dates.as_deref())
            .iter()
            .filter_map(|date| parse_date(date))
            .collect();

        Some(condo_projection::Bill {
            id: self.id.clone(),
            building_id: self.building_id.clone(),
            category: self.category.clone(),
            total_amount: self.total_amount.clone(),
            costs,
            recurrence: Recurrence::from(self.recurrence.as_str()),
            custom_dates,
            start_date,
            end_date,
        })
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

fn decode_list<T: serde::de::DeserializeOwned>(bill_id: &str, raw: Option<&str>) -> Vec<T> {
    let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) else {
        return Vec::new();
    };
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::debug!(bill_id, "Ignoring malformed list column: {}", e);
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bill() -> Bill {
        let mut bill = Bill::new(
            "b-1".into(),
            "bld-1".into(),
            "insurance".into(),
            "custom".into(),
            "2024-01-01".into(),
        );
        bill.total_amount = Some("6000".into());
        bill
    }

    #[test]
    fn test_to_engine_decodes_lists() {
        let mut row = bill();
        row.costs = Some(r#"["3000","3000"]"#.into());
        row.custom_dates = Some(r#"["2024-06-15","2024-12-15"]"#.into());
        row.end_date = Some("2024-12-31".into());

        let engine = row.to_engine().unwrap();
        assert_eq!(engine.recurrence, Recurrence::Custom);
        assert_eq!(engine.costs.len(), 2);
        assert_eq!(engine.custom_dates.len(), 2);
        assert_eq!(engine.end_date, NaiveDate::from_ymd_opt(2024, 12, 31));
    }

    #[test]
    fn test_malformed_lists_are_empty() {
        let mut row = bill();
        row.costs = Some("not json".into());
        row.custom_dates = Some(r#"["2024-06-15","someday"]"#.into());

        let engine = row.to_engine().unwrap();
        assert!(engine.costs.is_empty());
        assert_eq!(engine.custom_dates.len(), 1);
    }

    #[test]
    fn test_unreadable_start_date_skips_bill() {
        let mut row = bill();
        row.start_date = "01/01/2024".into();
        assert!(row.to_engine().is_none());
    }

    #[test]
    fn test_unreadable_end_date_skips_bill() {
        let mut row = bill();
        row.end_date = Some("31/12/2023".into());
        assert!(row.to_engine().is_none());

        row.end_date = Some("2023-12-31".into());
        let engine = row.to_engine().unwrap();
        assert_eq!(engine.end_date, NaiveDate::from_ymd_opt(2023, 12, 31));

        row.end_date = Some(" ".into());
        assert!(row.to_engine().unwrap().end_date.is_none());
    }
}
