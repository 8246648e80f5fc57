//! Engine data model
//!
//! Bills and residences are read-only inputs exactly as storage hands them
//! over: amounts arrive as raw text and are parsed leniently here, so a
//! malformed figure degrades to zero instead of failing the projection.
//! [`FinancialRecord`], [`ProjectionSummary`] and [`Projection`] are the
//! immutable outputs that get serialized into the cache.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Income category used for residence fees
pub const MONTHLY_FEES_CATEGORY: &str = "monthly_fees";

/// Parse a raw currency figure
///
/// Returns `None` for missing, blank or unparseable input. Sign is not
/// checked here; callers decide what a negative figure means.
pub fn parse_amount(raw: Option<&str>) -> Option<Decimal> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Parse a raw figure, keeping it only when it is zero or positive
fn non_negative(raw: Option<&str>) -> Option<Decimal> {
    parse_amount(raw).filter(|value| !value.is_sign_negative())
}

/// Rule governing the calendar months in which a bill charges
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Recurrence {
    Monthly,
    Quarterly,
    Yearly,
    Weekly,
    Custom,
    /// Any value storage holds that the engine does not understand
    Other(String),
}

impl Recurrence {
    pub fn as_str(&self) -> &str {
        match self {
            Recurrence::Monthly => "monthly",
            Recurrence::Quarterly => "quarterly",
            Recurrence::Yearly => "yearly",
            Recurrence::Weekly => "weekly",
            Recurrence::Custom => "custom",
            Recurrence::Other(raw) => raw,
        }
    }
}

impl From<&str> for Recurrence {
    fn from(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "monthly" => Recurrence::Monthly,
            "quarterly" => Recurrence::Quarterly,
            "yearly" | "annual" | "annually" => Recurrence::Yearly,
            "weekly" => Recurrence::Weekly,
            "custom" => Recurrence::Custom,
            _ => Recurrence::Other(raw.to_string()),
        }
    }
}

impl From<String> for Recurrence {
    fn from(raw: String) -> Self {
        Recurrence::from(raw.as_str())
    }
}

impl From<Recurrence> for String {
    fn from(recurrence: Recurrence) -> Self {
        recurrence.as_str().to_string()
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recurring charge against a building
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: String,
    pub building_id: String,
    /// Free-form expense category ("utilities", "insurance", ...)
    pub category: String,
    /// Total amount per occurrence, as stored
    pub total_amount: Option<String>,
    /// Per-occurrence cost figures, as stored
    #[serde(default)]
    pub costs: Vec<String>,
    pub recurrence: Recurrence,
    /// Charge dates for [`Recurrence::Custom`]
    #[serde(default)]
    pub custom_dates: Vec<NaiveDate>,
    /// First day the bill may charge (inclusive)
    pub start_date: NaiveDate,
    /// Last day the bill may charge (inclusive)
    pub end_date: Option<NaiveDate>,
}

impl Bill {
    /// Create a bill with a single cost figure equal to its total
    pub fn new(
        id: impl Into<String>,
        building_id: impl Into<String>,
        category: impl Into<String>,
        total_amount: impl Into<String>,
        recurrence: Recurrence,
        start_date: NaiveDate,
    ) -> Self {
        let total = total_amount.into();
        Self {
            id: id.into(),
            building_id: building_id.into(),
            category: category.into(),
            costs: vec![total.clone()],
            total_amount: Some(total),
            recurrence,
            custom_dates: Vec::new(),
            start_date,
            end_date: None,
        }
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn with_custom_dates(mut self, dates: Vec<NaiveDate>) -> Self {
        self.custom_dates = dates;
        self
    }

    pub fn with_costs(mut self, costs: Vec<String>) -> Self {
        self.costs = costs;
        self
    }

    /// Amount charged by one occurrence of the bill
    ///
    /// The total amount when it parses to a non-negative figure, otherwise
    /// the sum of the cost figures that do, otherwise zero.
    pub fn occurrence_amount(&self) -> Decimal {
        if let Some(total) = non_negative(self.total_amount.as_deref()) {
            return total;
        }
        let from_costs = self
            .costs
            .iter()
            .filter_map(|cost| non_negative(Some(cost)))
            .try_fold(Decimal::ZERO, |sum, cost| sum.checked_add(cost));
        let Some(from_costs) = from_costs else {
            tracing::warn!(bill_id = %self.id, "Bill costs overflow, treating as zero");
            return Decimal::ZERO;
        };
        if from_costs.is_zero() {
            tracing::debug!(bill_id = %self.id, "Bill has no usable amount, treating as zero");
        }
        from_costs
    }
}

/// A unit paying a monthly fee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Residence {
    pub id: String,
    pub building_id: String,
    /// Monthly fee, as stored
    pub monthly_fee: Option<String>,
    pub is_active: bool,
}

impl Residence {
    pub fn new(
        id: impl Into<String>,
        building_id: impl Into<String>,
        monthly_fee: Option<&str>,
        is_active: bool,
    ) -> Self {
        Self {
            id: id.into(),
            building_id: building_id.into(),
            monthly_fee: monthly_fee.map(str::to_string),
            is_active,
        }
    }

    /// Fee this residence contributes each month (zero when not eligible)
    pub fn contributing_fee(&self) -> Decimal {
        if !self.is_active {
            return Decimal::ZERO;
        }
        match parse_amount(self.monthly_fee.as_deref()) {
            Some(fee) if fee > Decimal::ZERO => fee,
            _ => Decimal::ZERO,
        }
    }
}

/// How records are grouped in a projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    #[default]
    Monthly,
    Yearly,
}

impl GroupBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupBy::Monthly => "monthly",
            GroupBy::Yearly => "yearly",
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupBy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(GroupBy::Monthly),
            "yearly" => Ok(GroupBy::Yearly),
            other => Err(format!("Unknown grouping: {}", other)),
        }
    }
}

/// Income and expenses for one month, or for a whole year when grouped yearly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialRecord {
    pub year: i32,
    /// Calendar month (1-12); absent for a year-folded record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_cash_flow: Decimal,
    pub income_by_category: BTreeMap<String, Decimal>,
    pub expenses_by_category: BTreeMap<String, Decimal>,
}

impl FinancialRecord {
    /// Empty record for a calendar month
    pub fn for_month(year: i32, month: u32) -> Self {
        Self::empty(year, Some(month))
    }

    /// Empty record for a calendar year
    pub fn for_year(year: i32) -> Self {
        Self::empty(year, None)
    }

    fn empty(year: i32, month: Option<u32>) -> Self {
        Self {
            year,
            month,
            total_income: Decimal::ZERO,
            total_expenses: Decimal::ZERO,
            net_cash_flow: Decimal::ZERO,
            income_by_category: BTreeMap::new(),
            expenses_by_category: BTreeMap::new(),
        }
    }

    /// Add an income contribution; zero contributions leave no trace
    ///
    /// A contribution that would overflow the category or the total is
    /// dropped with a warning and the record is left unchanged.
    pub fn add_income(&mut self, category: &str, amount: Decimal) {
        if accumulate(&mut self.income_by_category, &mut self.total_income, category, amount) {
            self.refresh_net();
        } else {
            tracing::warn!(year = self.year, category, %amount, "Income contribution overflows, ignoring it");
        }
    }

    /// Add an expense contribution; overflow is handled as in [`Self::add_income`]
    pub fn add_expense(&mut self, category: &str, amount: Decimal) {
        if accumulate(&mut self.expenses_by_category, &mut self.total_expenses, category, amount) {
            self.refresh_net();
        } else {
            tracing::warn!(year = self.year, category, %amount, "Expense contribution overflows, ignoring it");
        }
    }

    fn refresh_net(&mut self) {
        self.net_cash_flow = self.total_income.saturating_sub(self.total_expenses);
    }

    /// Fold another record's totals and categories into this one
    pub fn absorb(&mut self, other: &FinancialRecord) {
        for (category, amount) in &other.income_by_category {
            self.add_income(category, *amount);
        }
        for (category, amount) in &other.expenses_by_category {
            self.add_expense(category, *amount);
        }
    }
}

/// Totals and averages folded over the monthly records of a projection
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_cash_flow: Decimal,
    pub average_monthly_income: Decimal,
    pub average_monthly_expenses: Decimal,
    pub month_count: u32,
    pub income_by_category: BTreeMap<String, Decimal>,
    pub expenses_by_category: BTreeMap<String, Decimal>,
}

impl ProjectionSummary {
    /// Fold a list of monthly records
    pub fn from_monthly(records: &[FinancialRecord]) -> Self {
        let mut totals = FinancialRecord::for_year(0);
        for record in records {
            totals.absorb(record);
        }

        let month_count = records.len() as u32;
        Self {
            average_monthly_income: average(totals.total_income, month_count),
            average_monthly_expenses: average(totals.total_expenses, month_count),
            total_income: totals.total_income,
            total_expenses: totals.total_expenses,
            net_cash_flow: totals.net_cash_flow,
            month_count,
            income_by_category: totals.income_by_category,
            expenses_by_category: totals.expenses_by_category,
        }
    }
}

/// Add `amount` to a category and its total; `false` when either would overflow
fn accumulate(
    by_category: &mut BTreeMap<String, Decimal>,
    total: &mut Decimal,
    category: &str,
    amount: Decimal,
) -> bool {
    if amount.is_zero() {
        return true;
    }
    let current = by_category.get(category).copied().unwrap_or(Decimal::ZERO);
    let (Some(category_sum), Some(new_total)) = (current.checked_add(amount), total.checked_add(amount)) else {
        return false;
    };
    by_category.insert(category.to_string(), category_sum);
    *total = new_total;
    true
}

fn average(total: Decimal, count: u32) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    (total / Decimal::from(count)).round_dp(2)
}

/// Records for a requested range plus their summary
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub records: Vec<FinancialRecord>,
    pub summary: ProjectionSummary,
}

impl Projection {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Inclusive date range of a projection request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// January 1st of `start_year` through December 31st of `end_year`
    ///
    /// Returns `None` when either year is outside chrono's calendar.
    pub fn years(start_year: i32, end_year: i32) -> Option<Self> {
        Some(Self {
            start: NaiveDate::from_ymd_opt(start_year, 1, 1)?,
            end: NaiveDate::from_ymd_opt(end_year, 12, 31)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Every (year, month) pair touched by the range, in order
    pub fn months(&self) -> Vec<(i32, u32)> {
        let mut months = Vec::new();
        if self.is_empty() {
            return months;
        }
        let (mut year, mut month) = (self.start.year(), self.start.month());
        let last = (self.end.year(), self.end.month());
        while (year, month) <= last {
            months.push((year, month));
            if month == 12 {
                year += 1;
                month = 1;
            } else {
                month += 1;
            }
        }
        months
    }
}
