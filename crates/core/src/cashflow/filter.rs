//! Ledger entry filters and named reporting periods.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::types::OperationType;

/// A named reporting window, resolved against a caller-supplied "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportingPeriod {
    /// Today only.
    Today,
    /// Yesterday only.
    Yesterday,
    /// The trailing 7 days, inclusive of today.
    Last7Days,
    /// The trailing 30 days, inclusive of today.
    Last30Days,
    /// No date bounds.
    AllTime,
    /// An explicit window; either end may be open.
    Custom {
        /// Inclusive start.
        start: Option<NaiveDate>,
        /// Inclusive end.
        end: Option<NaiveDate>,
    },
}

impl ReportingPeriod {
    /// Resolves the period to inclusive `(start, end)` bounds.
    ///
    /// `None` on either side means unbounded.
    #[must_use]
    pub fn date_range(self, today: NaiveDate) -> (Option<NaiveDate>, Option<NaiveDate>) {
        match self {
            Self::Today => (Some(today), Some(today)),
            Self::Yesterday => {
                let y = today - Days::new(1);
                (Some(y), Some(y))
            }
            Self::Last7Days => (Some(today - Days::new(7)), Some(today)),
            Self::Last30Days => (Some(today - Days::new(30)), Some(today)),
            Self::AllTime => (None, None),
            Self::Custom { start, end } => (start, end),
        }
    }
}

/// Which side of the ledger to keep when filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowDirection {
    /// Income-like entries (income, technical income).
    Income,
    /// Expense-like entries (expense, technical expense).
    Expense,
}

impl FlowDirection {
    /// The operation types belonging to this direction.
    #[must_use]
    pub const fn operation_types(self) -> [OperationType; 2] {
        match self {
            Self::Income => [OperationType::Income, OperationType::TechnicalIncome],
            Self::Expense => [OperationType::Expense, OperationType::TechnicalExpense],
        }
    }
}

/// Filter options for listing and aggregating ledger entries.
///
/// All fields are optional and AND-combined. An exact date takes
/// precedence over a named period.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Named reporting window.
    pub period: Option<ReportingPeriod>,
    /// Exact entry date; overrides `period`.
    pub exact_date: Option<NaiveDate>,
    /// Keep only income-like or expense-like entries.
    pub flow: Option<FlowDirection>,
    /// Filter by wallet.
    pub wallet_id: Option<Uuid>,
    /// Filter by category.
    pub category_id: Option<Uuid>,
    /// Filter by the category's activity type.
    pub activity_type: Option<String>,
    /// Minimum entry magnitude, inclusive.
    pub amount_min: Option<Decimal>,
    /// Maximum entry magnitude, inclusive.
    pub amount_max: Option<Decimal>,
    /// Case-insensitive description substring.
    pub description_substring: Option<String>,
}

impl EntryFilter {
    /// Resolves the effective inclusive date bounds of this filter.
    ///
    /// An exact date collapses both bounds onto itself; otherwise the
    /// named period (if any) is resolved against `today`.
    #[must_use]
    pub fn date_bounds(&self, today: NaiveDate) -> (Option<NaiveDate>, Option<NaiveDate>) {
        if let Some(exact) = self.exact_date {
            return (Some(exact), Some(exact));
        }
        self.period
            .map_or((None, None), |p| p.date_range(today))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[rstest]
    #[case(ReportingPeriod::Today, Some(d(2026, 3, 15)), Some(d(2026, 3, 15)))]
    #[case(ReportingPeriod::Yesterday, Some(d(2026, 3, 14)), Some(d(2026, 3, 14)))]
    #[case(ReportingPeriod::Last7Days, Some(d(2026, 3, 8)), Some(d(2026, 3, 15)))]
    #[case(ReportingPeriod::Last30Days, Some(d(2026, 2, 13)), Some(d(2026, 3, 15)))]
    #[case(ReportingPeriod::AllTime, None, None)]
    fn test_named_period_ranges(
        #[case] period: ReportingPeriod,
        #[case] start: Option<NaiveDate>,
        #[case] end: Option<NaiveDate>,
    ) {
        assert_eq!(period.date_range(d(2026, 3, 15)), (start, end));
    }

    #[test]
    fn test_custom_period_passthrough() {
        let period = ReportingPeriod::Custom {
            start: Some(d(2026, 1, 1)),
            end: None,
        };
        assert_eq!(
            period.date_range(d(2026, 3, 15)),
            (Some(d(2026, 1, 1)), None)
        );
    }

    #[test]
    fn test_exact_date_overrides_period() {
        let filter = EntryFilter {
            period: Some(ReportingPeriod::Last30Days),
            exact_date: Some(d(2026, 2, 2)),
            ..Default::default()
        };
        assert_eq!(
            filter.date_bounds(d(2026, 3, 15)),
            (Some(d(2026, 2, 2)), Some(d(2026, 2, 2)))
        );
    }

    #[test]
    fn test_empty_filter_is_unbounded() {
        let filter = EntryFilter::default();
        assert_eq!(filter.date_bounds(d(2026, 3, 15)), (None, None));
    }

    #[test]
    fn test_flow_direction_types() {
        assert_eq!(
            FlowDirection::Income.operation_types(),
            [OperationType::Income, OperationType::TechnicalIncome]
        );
        assert_eq!(
            FlowDirection::Expense.operation_types(),
            [OperationType::Expense, OperationType::TechnicalExpense]
        );
    }
}
