//! Schedule expansion
//!
//! Decides whether a bill charges in a given calendar month and for how much.

use chrono::Datelike;
use rust_decimal::Decimal;

use crate::model::{Bill, Recurrence};

/// Months in which quarterly bills charge, anchored to the calendar year
pub const QUARTER_MONTHS: [u32; 4] = [1, 4, 7, 10];

/// Average number of weeks per month used to turn a weekly charge into a monthly one
pub fn weeks_per_month() -> Decimal {
    Decimal::new(433, 2)
}

/// Whether `(year, month)` lies within the bill's start/end window
///
/// Comparison is by (year, month) only: a bill starting on the 20th still
/// charges in its start month, and one ending on the 1st still charges in
/// its end month.
pub fn is_active_in(bill: &Bill, year: i32, month: u32) -> bool {
    let target = (year, month);
    if target < (bill.start_date.year(), bill.start_date.month()) {
        return false;
    }
    match bill.end_date {
        Some(end) => target <= (end.year(), end.month()),
        None => true,
    }
}

/// Amount `bill` charges in `(year, month)`
pub fn charge_amount(bill: &Bill, year: i32, month: u32) -> Decimal {
    if !is_active_in(bill, year, month) {
        return Decimal::ZERO;
    }

    let charges = match &bill.recurrence {
        Recurrence::Monthly => true,
        Recurrence::Quarterly => QUARTER_MONTHS.contains(&month),
        Recurrence::Yearly => month == bill.start_date.month(),
        Recurrence::Weekly => return weekly_charge(bill),
        Recurrence::Custom => bill
            .custom_dates
            .iter()
            .any(|date| date.year() == year && date.month() == month),
        Recurrence::Other(kind) => {
            tracing::debug!(bill_id = %bill.id, kind = %kind, "Unrecognized recurrence, no charge");
            false
        }
    };

    if charges {
        bill.occurrence_amount()
    } else {
        Decimal::ZERO
    }
}

fn weekly_charge(bill: &Bill) -> Decimal {
    let amount = bill.occurrence_amount();
    amount.checked_mul(weeks_per_month()).unwrap_or_else(|| {
        tracing::warn!(bill_id = %bill.id, %amount, "Weekly charge overflows, treating as zero");
        Decimal::ZERO
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bill(recurrence: Recurrence, start: NaiveDate) -> Bill {
        Bill::new("bill-1", "bld-1", "utilities", "1000", recurrence, start)
    }

    #[test]
    fn test_monthly_charges_inside_window_only() {
        let b = bill(Recurrence::Monthly, date(2024, 3, 15)).with_end_date(date(2024, 9, 1));

        for month in 1..=12 {
            let expected = if (3..=9).contains(&month) { dec!(1000) } else { Decimal::ZERO };
            assert_eq!(charge_amount(&b, 2024, month), expected, "month {}", month);
        }
        assert_eq!(charge_amount(&b, 2023, 12), Decimal::ZERO);
        assert_eq!(charge_amount(&b, 2025, 3), Decimal::ZERO);
    }

    #[test]
    fn test_quarterly_anchored_to_calendar() {
        let b = bill(Recurrence::Quarterly, date(2024, 2, 1));

        let charged: Vec<u32> = (1..=12)
            .filter(|m| !charge_amount(&b, 2024, *m).is_zero())
            .collect();
        assert_eq!(charged, vec![4, 7, 10]);

        let charged_next: Vec<u32> = (1..=12)
            .filter(|m| !charge_amount(&b, 2025, *m).is_zero())
            .collect();
        assert_eq!(charged_next, vec![1, 4, 7, 10]);
    }

    #[test]
    fn test_yearly_charges_in_start_month_every_year() {
        let b = bill(Recurrence::Yearly, date(2023, 6, 10));

        for year in 2023..=2026 {
            for month in 1..=12 {
                let expected = if month == 6 { dec!(1000) } else { Decimal::ZERO };
                assert_eq!(charge_amount(&b, year, month), expected);
            }
        }
    }

    #[test]
    fn test_weekly_uses_fixed_multiplier() {
        let b = bill(Recurrence::Weekly, date(2024, 1, 1));
        assert_eq!(charge_amount(&b, 2024, 2), dec!(4330));
    }

    #[test]
    fn test_custom_matches_year_and_month() {
        let b = bill(Recurrence::Custom, date(2024, 1, 1))
            .with_custom_dates(vec![date(2024, 6, 15), date(2024, 12, 15)]);

        for month in 1..=12 {
            let expected = if month == 6 || month == 12 { dec!(1000) } else { Decimal::ZERO };
            assert_eq!(charge_amount(&b, 2024, month), expected, "month {}", month);
        }
        assert_eq!(charge_amount(&b, 2025, 6), Decimal::ZERO);
    }

    #[test]
    fn test_unknown_recurrence_is_zero() {
        let b = bill(Recurrence::from("fortnightly"), date(2024, 1, 1));
        assert!((1..=12).all(|m| charge_amount(&b, 2024, m).is_zero()));
    }

    #[test]
    fn test_bill_ended_before_year_contributes_nothing() {
        let b = bill(Recurrence::Monthly, date(2023, 1, 1)).with_end_date(date(2023, 12, 31));
        assert!((1..=12).all(|m| charge_amount(&b, 2024, m).is_zero()));
        assert_eq!(charge_amount(&b, 2023, 12), dec!(1000));
    }

    #[test]
    fn test_malformed_amount_charges_zero() {
        let b = Bill::new("b", "bld", "utilities", "n/a", Recurrence::Monthly, date(2024, 1, 1))
            .with_costs(vec!["n/a".into()]);
        assert_eq!(charge_amount(&b, 2024, 5), Decimal::ZERO);
    }

    #[test]
    fn test_weekly_overflow_charges_zero() {
        let b = Bill::new(
            "b",
            "bld",
            "cleaning",
            Decimal::MAX.to_string(),
            Recurrence::Weekly,
            date(2024, 1, 1),
        );
        assert_eq!(charge_amount(&b, 2024, 3), Decimal::ZERO);
    }
}
