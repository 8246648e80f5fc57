//! Projection building
//!
//! Expands every bill's schedule over each month of a range, adds residence
//! income, and folds the months into a summary (and, on request, into
//! yearly records).

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::error::{ProjectionError, Result};
use crate::income::monthly_income;
use crate::model::{
    Bill, DateRange, FinancialRecord, GroupBy, Projection, ProjectionSummary, Residence,
};
use crate::schedule::charge_amount;
use crate::source::FinancialSource;

/// Builds projections from a [`FinancialSource`]
#[derive(Clone)]
pub struct ProjectionBuilder {
    source: Arc<dyn FinancialSource>,
}

impl ProjectionBuilder {
    pub fn new(source: Arc<dyn FinancialSource>) -> Self {
        Self { source }
    }

    /// Build the projection of `building_id` over `range`
    ///
    /// An inverted range yields an empty projection rather than an error;
    /// range validation belongs to the request boundary. Bills and
    /// residences are loaded once per call.
    #[instrument(skip(self), fields(start = %range.start, end = %range.end))]
    pub async fn build(
        &self,
        building_id: &str,
        range: DateRange,
        group_by: GroupBy,
    ) -> Result<Projection> {
        if range.is_empty() {
            debug!("Inverted range, returning empty projection");
            return Ok(Projection::empty());
        }

        self.source
            .building(building_id)
            .await?
            .ok_or_else(|| ProjectionError::BuildingNotFound(building_id.to_string()))?;

        let bills = self.source.bills(building_id).await?;
        let residences = self.source.residences(building_id).await?;
        debug!(
            bills = bills.len(),
            residences = residences.len(),
            "Loaded building records"
        );

        Ok(project(&bills, &residences, range, group_by))
    }
}

/// Compute a projection from records already in hand
pub fn project(
    bills: &[Bill],
    residences: &[Residence],
    range: DateRange,
    group_by: GroupBy,
) -> Projection {
    let income = monthly_income(residences);

    let monthly: Vec<FinancialRecord> = range
        .months()
        .into_iter()
        .map(|(year, month)| {
            let mut record = FinancialRecord::for_month(year, month);
            for (category, amount) in &income.by_category {
                record.add_income(category, *amount);
            }
            for bill in bills {
                record.add_expense(&bill.category, charge_amount(bill, year, month));
            }
            record
        })
        .collect();

    let summary = ProjectionSummary::from_monthly(&monthly);
    let records = match group_by {
        GroupBy::Monthly => monthly,
        GroupBy::Yearly => fold_yearly(&monthly),
    };

    Projection { records, summary }
}

/// Fold monthly records into one record per calendar year
pub fn fold_yearly(monthly: &[FinancialRecord]) -> Vec<FinancialRecord> {
    let mut years: Vec<FinancialRecord> = Vec::new();
    for record in monthly {
        match years.last_mut() {
            Some(current) if current.year == record.year => current.absorb(record),
            _ => {
                let mut year = FinancialRecord::for_year(record.year);
                year.absorb(record);
                years.push(year);
            }
        }
    }
    years
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Recurrence;
    use crate::source::InMemoryFinancialSource;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_source() -> Arc<InMemoryFinancialSource> {
        let source = Arc::new(InMemoryFinancialSource::new());
        source.add_building("bld-1", "Les Jardins");
        source.add_bill(Bill::new("u", "bld-1", "utilities", "2500", Recurrence::Monthly, date(2024, 1, 1)));
        source.add_bill(Bill::new("i", "bld-1", "insurance", "6000", Recurrence::Quarterly, date(2024, 1, 1)));
        source.add_residence(Residence::new("r1", "bld-1", Some("1800"), true));
        source.add_residence(Residence::new("r2", "bld-1", Some("1650"), true));
        source
    }

    #[tokio::test]
    async fn test_expense_totals_for_year() {
        let builder = ProjectionBuilder::new(sample_source());
        let projection = builder
            .build("bld-1", DateRange::years(2024, 2024).unwrap(), GroupBy::Monthly)
            .await
            .unwrap();

        assert_eq!(projection.records.len(), 12);
        assert_eq!(projection.records[0].total_expenses, dec!(8500));
        assert_eq!(projection.records[1].total_expenses, dec!(2500));
        assert_eq!(projection.summary.total_expenses, dec!(54000));
        assert_eq!(projection.summary.total_income, dec!(41400));
        assert_eq!(projection.records[1].net_cash_flow, dec!(950));
        assert!(!projection.records[1].expenses_by_category.contains_key("insurance"));
    }

    #[tokio::test]
    async fn test_yearly_grouping_agrees_with_monthly_summary() {
        let builder = ProjectionBuilder::new(sample_source());
        let range = DateRange::years(2024, 2025).unwrap();

        let monthly = builder.build("bld-1", range, GroupBy::Monthly).await.unwrap();
        let yearly = builder.build("bld-1", range, GroupBy::Yearly).await.unwrap();

        assert_eq!(yearly.records.len(), 2);
        assert_eq!(yearly.records[0].month, None);
        assert_eq!(yearly.records[0].total_expenses, dec!(54000));
        assert_eq!(yearly.records[0].expenses_by_category["insurance"], dec!(24000));
        assert_eq!(monthly.summary, yearly.summary);
    }

    #[tokio::test]
    async fn test_inverted_range_is_empty() {
        let builder = ProjectionBuilder::new(sample_source());
        let range = DateRange::new(date(2025, 1, 1), date(2024, 1, 1));

        let projection = builder.build("bld-1", range, GroupBy::Monthly).await.unwrap();
        assert!(projection.records.is_empty());
        assert_eq!(projection.summary.total_income, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_unknown_building_fails() {
        let builder = ProjectionBuilder::new(sample_source());
        let err = builder
            .build("nope", DateRange::years(2024, 2024).unwrap(), GroupBy::Monthly)
            .await
            .unwrap_err();
        assert_eq!(err, ProjectionError::BuildingNotFound("nope".to_string()));
    }

    #[test]
    fn test_partial_range_months() {
        let bills = vec![Bill::new("u", "b", "utilities", "100", Recurrence::Monthly, date(2024, 1, 1))];
        let range = DateRange::new(date(2024, 11, 20), date(2025, 2, 3));

        let projection = project(&bills, &[], range, GroupBy::Monthly);
        let months: Vec<_> = projection.records.iter().map(|r| (r.year, r.month)).collect();
        assert_eq!(
            months,
            vec![(2024, Some(11)), (2024, Some(12)), (2025, Some(1)), (2025, Some(2))]
        );
        assert_eq!(projection.summary.total_expenses, dec!(400));
    }
}
