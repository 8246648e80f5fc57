//! Residence fee aggregation

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::{Residence, MONTHLY_FEES_CATEGORY};

/// Monthly income of a building, by category
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IncomeBreakdown {
    pub total: Decimal,
    pub by_category: BTreeMap<String, Decimal>,
}

/// Sum the fees of every active residence with a positive fee
///
/// The result does not depend on the month: a residence contributes the
/// same amount to every month of a projection, without prorating.
pub fn monthly_income(residences: &[Residence]) -> IncomeBreakdown {
    let total = residences.iter().fold(Decimal::ZERO, |total, residence| {
        let fee = residence.contributing_fee();
        total.checked_add(fee).unwrap_or_else(|| {
            tracing::warn!(residence_id = %residence.id, %fee, "Residence fee overflows income, ignoring it");
            total
        })
    });

    let mut by_category = BTreeMap::new();
    if !total.is_zero() {
        by_category.insert(MONTHLY_FEES_CATEGORY.to_string(), total);
    }

    IncomeBreakdown { total, by_category }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_skips_zero_and_unparseable_fees() {
        let residences = vec![
            Residence::new("r1", "b", Some("1800"), true),
            Residence::new("r2", "b", Some("1650"), true),
            Residence::new("r3", "b", Some("0"), true),
            Residence::new("r4", "b", None, true),
        ];

        let income = monthly_income(&residences);
        assert_eq!(income.total, dec!(3450));
        assert_eq!(income.by_category.get(MONTHLY_FEES_CATEGORY), Some(&dec!(3450)));
        assert_eq!(income.by_category.len(), 1);
    }

    #[test]
    fn test_inactive_residences_ignored() {
        let residences = vec![
            Residence::new("r1", "b", Some("1200"), false),
            Residence::new("r2", "b", Some("900.50"), true),
        ];
        assert_eq!(monthly_income(&residences).total, dec!(900.50));
    }

    #[test]
    fn test_no_income_omits_category() {
        let income = monthly_income(&[Residence::new("r1", "b", Some("garbage"), true)]);
        assert!(income.total.is_zero());
        assert!(income.by_category.is_empty());
    }

    #[test]
    fn test_overflowing_fee_is_ignored() {
        let max = Decimal::MAX.to_string();
        let residences = vec![
            Residence::new("r1", "b", Some(max.as_str()), true),
            Residence::new("r2", "b", Some("100"), true),
        ];
        assert_eq!(monthly_income(&residences).total, Decimal::MAX);
    }
}
