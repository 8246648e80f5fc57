//! Fan-out summaries across several buildings

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::join_all;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{ProjectionError, Result};
use crate::model::{DateRange, GroupBy, ProjectionSummary};
use crate::service::ProjectionService;

/// Upper bound on buildings per summary request
pub const DEFAULT_MAX_BUILDINGS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingSummary {
    pub building_id: String,
    pub summary: ProjectionSummary,
    pub cached: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingFailure {
    pub building_id: String,
    pub reason: String,
}

/// Per-building outcomes of one year plus their aggregate
///
/// The aggregate sums totals and category maps over the succeeded
/// buildings; its averages are the sums of the per-building averages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiBuildingSummary {
    pub year: i32,
    pub succeeded: Vec<BuildingSummary>,
    pub failed: Vec<BuildingFailure>,
    pub aggregate: ProjectionSummary,
    pub succeeded_count: usize,
    pub failed_count: usize,
}

pub struct SummaryCoordinator {
    service: Arc<ProjectionService>,
    max_buildings: usize,
}

impl SummaryCoordinator {
    pub fn new(service: Arc<ProjectionService>) -> Self {
        Self {
            service,
            max_buildings: DEFAULT_MAX_BUILDINGS,
        }
    }

    pub fn with_max_buildings(mut self, max_buildings: usize) -> Self {
        self.max_buildings = max_buildings;
        self
    }

    pub fn max_buildings(&self) -> usize {
        self.max_buildings
    }

    /// Summarize `year` for every building concurrently
    ///
    /// A building that fails is reported in `failed` and never fails the
    /// whole request. Results keep the order of `building_ids`.
    #[instrument(skip(self), fields(count = building_ids.len()))]
    pub async fn summarize(&self, building_ids: &[String], year: i32) -> Result<MultiBuildingSummary> {
        if building_ids.is_empty() {
            return Err(ProjectionError::EmptyBuildingList);
        }
        if building_ids.len() > self.max_buildings {
            return Err(ProjectionError::TooManyBuildings {
                count: building_ids.len(),
                max: self.max_buildings,
            });
        }
        let range = DateRange::years(year, year)
            .ok_or_else(|| ProjectionError::InvalidRange(format!("year {} is out of range", year)))?;

        let lookups = building_ids.iter().map(|building_id| async move {
            let outcome = self
                .service
                .projection(building_id, range, GroupBy::Monthly, false)
                .await;
            (building_id.clone(), outcome)
        });

        let mut succeeded = Vec::new();
        let mut failed = Vec::new();
        for (building_id, outcome) in join_all(lookups).await {
            match outcome {
                Ok(outcome) => succeeded.push(BuildingSummary {
                    building_id,
                    summary: outcome.projection.summary.clone(),
                    cached: outcome.cached,
                }),
                Err(e) => {
                    tracing::warn!(building_id = %building_id, "Building summary failed: {}", e);
                    failed.push(BuildingFailure {
                        building_id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let aggregate = aggregate(&succeeded);
        Ok(MultiBuildingSummary {
            year,
            succeeded_count: succeeded.len(),
            failed_count: failed.len(),
            succeeded,
            failed,
            aggregate,
        })
    }
}

fn aggregate(succeeded: &[BuildingSummary]) -> ProjectionSummary {
    let mut total = ProjectionSummary::default();
    for building in succeeded {
        match merge(&total, &building.summary) {
            Some(merged) => total = merged,
            None => tracing::warn!(
                building_id = %building.building_id,
                "Building totals overflow the aggregate, leaving them out"
            ),
        }
    }
    total
}

/// `total` plus `summary`, `None` when any figure would overflow
fn merge(total: &ProjectionSummary, summary: &ProjectionSummary) -> Option<ProjectionSummary> {
    let mut merged = ProjectionSummary {
        total_income: total.total_income.checked_add(summary.total_income)?,
        total_expenses: total.total_expenses.checked_add(summary.total_expenses)?,
        net_cash_flow: total.net_cash_flow.checked_add(summary.net_cash_flow)?,
        average_monthly_income: total
            .average_monthly_income
            .checked_add(summary.average_monthly_income)?,
        average_monthly_expenses: total
            .average_monthly_expenses
            .checked_add(summary.average_monthly_expenses)?,
        month_count: total.month_count.max(summary.month_count),
        income_by_category: total.income_by_category.clone(),
        expenses_by_category: total.expenses_by_category.clone(),
    };
    merge_categories(&mut merged.income_by_category, &summary.income_by_category)?;
    merge_categories(&mut merged.expenses_by_category, &summary.expenses_by_category)?;
    Some(merged)
}

fn merge_categories(
    into: &mut BTreeMap<String, Decimal>,
    from: &BTreeMap<String, Decimal>,
) -> Option<()> {
    for (category, amount) in from {
        let entry = into.entry(category.clone()).or_default();
        *entry = entry.checked_add(*amount)?;
    }
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStore;
    use crate::model::{Bill, Recurrence, Residence};
    use crate::source::InMemoryFinancialSource;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::time::Duration;

    fn coordinator() -> SummaryCoordinator {
        let source = Arc::new(InMemoryFinancialSource::new());
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        for (id, fee) in [("bld-a", "1000"), ("bld-b", "2000")] {
            source.add_building(id, id);
            source.add_residence(Residence::new(format!("{}-r", id), id, Some(fee), true));
            source.add_bill(Bill::new(format!("{}-u", id), id, "utilities", "500", Recurrence::Monthly, start));
        }
        source.add_building("bld-down", "Down");
        source.fail_building("bld-down");

        let store = Arc::new(CacheStore::in_memory(Duration::from_secs(600)));
        SummaryCoordinator::new(Arc::new(ProjectionService::new(source, store)))
    }

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[tokio::test]
    async fn test_partial_failure_is_reported() {
        let summary = coordinator()
            .summarize(&ids(&["bld-a", "bld-down", "bld-b"]), 2024)
            .await
            .unwrap();

        assert_eq!(summary.succeeded_count, 2);
        assert_eq!(summary.failed_count, 1);
        assert_eq!(summary.failed[0].building_id, "bld-down");
        assert_eq!(summary.succeeded[0].building_id, "bld-a");
        assert_eq!(summary.succeeded[1].building_id, "bld-b");
    }

    #[tokio::test]
    async fn test_aggregate_sums_succeeded_buildings() {
        let summary = coordinator()
            .summarize(&ids(&["bld-a", "bld-b"]), 2024)
            .await
            .unwrap();

        assert_eq!(summary.aggregate.total_income, dec!(36000));
        assert_eq!(summary.aggregate.total_expenses, dec!(12000));
        assert_eq!(summary.aggregate.net_cash_flow, dec!(24000));
        assert_eq!(summary.aggregate.average_monthly_income, dec!(3000));
        assert_eq!(summary.aggregate.expenses_by_category["utilities"], dec!(12000));
        assert_eq!(summary.aggregate.month_count, 12);
    }

    #[tokio::test]
    async fn test_unknown_building_fails_alone() {
        let summary = coordinator()
            .summarize(&ids(&["bld-a", "nowhere"]), 2024)
            .await
            .unwrap();

        assert_eq!(summary.succeeded_count, 1);
        assert_eq!(summary.failed_count, 1);
    }

    #[tokio::test]
    async fn test_rejects_empty_and_oversized_lists() {
        let coordinator = coordinator().with_max_buildings(2);

        let err = coordinator.summarize(&[], 2024).await.unwrap_err();
        assert_eq!(err, ProjectionError::EmptyBuildingList);

        let err = coordinator
            .summarize(&ids(&["a", "b", "c"]), 2024)
            .await
            .unwrap_err();
        assert_eq!(err, ProjectionError::TooManyBuildings { count: 3, max: 2 });
    }

    #[tokio::test]
    async fn test_overflowing_building_does_not_sink_the_batch() {
        let source = Arc::new(InMemoryFinancialSource::new());
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        source.add_building("good", "Good");
        source.add_bill(Bill::new("good-u", "good", "utilities", "100", Recurrence::Monthly, start));
        source.add_building("huge", "Huge");
        source.add_bill(Bill::new(
            "huge-u",
            "huge",
            "utilities",
            "79228162514264337593543950335",
            Recurrence::Monthly,
            start,
        ));
        let store = Arc::new(CacheStore::in_memory(Duration::from_secs(600)));
        let coordinator = SummaryCoordinator::new(Arc::new(ProjectionService::new(source, store)));

        let summary = coordinator
            .summarize(&ids(&["good", "huge"]), 2024)
            .await
            .unwrap();

        assert_eq!(summary.succeeded_count, 2);
        assert_eq!(summary.failed_count, 0);
        assert_eq!(summary.succeeded[0].summary.total_expenses, dec!(1200));
        assert_eq!(summary.succeeded[1].summary.total_expenses, Decimal::MAX);
        assert_eq!(summary.aggregate.total_expenses, dec!(1200));
    }
}
