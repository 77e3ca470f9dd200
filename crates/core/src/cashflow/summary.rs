//! Cashflow summaries: per-activity totals, monthly in/out, and the
//! trailing-12-month pivot.
//!
//! All aggregation happens over `EntryClass` projections the database
//! layer loads; income and expense are reported as non-negative
//! magnitudes, and `net_flow = income - expense`.

use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use super::balance::signed_amount;
use super::types::EntryClass;

/// Income/expense magnitudes and their net.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlowTotals {
    /// Sum of income-like magnitudes.
    pub income: Decimal,
    /// Sum of expense-like magnitudes.
    pub expense: Decimal,
    /// `income - expense`.
    pub net_flow: Decimal,
}

impl FlowTotals {
    fn add(&mut self, entry: &EntryClass) {
        if entry.operation_type.is_income_like() {
            self.income += entry.amount;
        } else {
            self.expense += entry.amount;
        }
        self.net_flow = self.income - self.expense;
    }
}

/// One activity-type row of the cashflow summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityFlow {
    /// The activity type (e.g. "operating").
    pub activity_type: String,
    /// Flow totals for this activity.
    #[serde(flatten)]
    pub totals: FlowTotals,
}

/// Cashflow summary grouped by activity type.
#[derive(Debug, Clone, Serialize)]
pub struct CashflowSummary {
    /// One row per activity type, ordered by name.
    pub details: Vec<ActivityFlow>,
    /// Grand totals across all activity types.
    pub total: FlowTotals,
}

/// Income/expense magnitudes for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyInOut {
    /// Month number, 1-12.
    pub month: u32,
    /// Flow totals for the month.
    #[serde(flatten)]
    pub totals: FlowTotals,
}

/// One (year, month) column of the trailing-12-month pivot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PivotPeriod {
    /// Calendar year.
    pub year: i32,
    /// Month number, 1-12.
    pub month: u32,
    /// Net flow per activity type, parallel to the report's
    /// `activity_types`; zero when the activity had no entries.
    pub net_flows: Vec<Decimal>,
    /// Net flow across all activities in this period.
    pub total: Decimal,
}

/// Pivot of per-activity net flows over the trailing 12 months.
#[derive(Debug, Clone, Serialize)]
pub struct Pivot12Report {
    /// Activity types present in the data, ordered by name.
    pub activity_types: Vec<String>,
    /// The 12 periods, oldest first, zero-filled.
    pub periods: Vec<PivotPeriod>,
}

/// Groups entries by activity type, summing income and expense
/// magnitudes separately.
#[must_use]
pub fn summarize_by_activity(entries: &[EntryClass]) -> CashflowSummary {
    let mut by_activity: BTreeMap<&str, FlowTotals> = BTreeMap::new();
    let mut total = FlowTotals::default();

    for entry in entries {
        by_activity
            .entry(entry.activity_type.as_str())
            .or_default()
            .add(entry);
        total.add(entry);
    }

    let details = by_activity
        .into_iter()
        .map(|(activity_type, totals)| ActivityFlow {
            activity_type: activity_type.to_string(),
            totals,
        })
        .collect();

    CashflowSummary { details, total }
}

/// Sums income and expense per month of `year`, zero-filling months
/// with no matching entries.
#[must_use]
pub fn monthly_in_out(entries: &[EntryClass], year: i32) -> Vec<MonthlyInOut> {
    let mut months: Vec<MonthlyInOut> = (1..=12)
        .map(|month| MonthlyInOut {
            month,
            totals: FlowTotals::default(),
        })
        .collect();

    for entry in entries {
        if entry.entry_date.year() == year {
            let idx = (entry.entry_date.month() - 1) as usize;
            months[idx].totals.add(entry);
        }
    }

    months
}

/// The trailing 12 calendar months ending at `today`'s month, oldest
/// first, as (year, month) pairs.
#[must_use]
pub fn trailing_12_months(today: NaiveDate) -> Vec<(i32, u32)> {
    let anchor = today.with_day(1).unwrap_or(today);
    (0..12)
        .rev()
        .map(|back| {
            let d = anchor - Months::new(back);
            (d.year(), d.month())
        })
        .collect()
}

/// Builds the trailing-12-month pivot of net flows per activity type.
///
/// Periods with no entries appear zero-filled so the pivot always has
/// exactly 12 columns.
#[must_use]
pub fn pivot_last_12_months(entries: &[EntryClass], today: NaiveDate) -> Pivot12Report {
    let periods = trailing_12_months(today);
    let period_index: BTreeMap<(i32, u32), usize> = periods
        .iter()
        .enumerate()
        .map(|(i, ym)| (*ym, i))
        .collect();

    let mut activity_types: Vec<String> = entries
        .iter()
        .map(|e| e.activity_type.clone())
        .collect();
    activity_types.sort();
    activity_types.dedup();

    let activity_index: BTreeMap<&str, usize> = activity_types
        .iter()
        .enumerate()
        .map(|(i, a)| (a.as_str(), i))
        .collect();

    // cells[period][activity]
    let mut cells = vec![vec![Decimal::ZERO; activity_types.len()]; periods.len()];

    for entry in entries {
        let ym = (entry.entry_date.year(), entry.entry_date.month());
        let Some(&p) = period_index.get(&ym) else {
            continue; // outside the trailing window
        };
        let a = activity_index[entry.activity_type.as_str()];
        cells[p][a] += signed_amount(entry.operation_type, entry.amount);
    }

    let periods = periods
        .into_iter()
        .zip(cells)
        .map(|((year, month), net_flows)| {
            let total = net_flows.iter().copied().sum();
            PivotPeriod {
                year,
                month,
                net_flows,
                total,
            }
        })
        .collect();

    Pivot12Report {
        activity_types,
        periods,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cashflow::types::OperationType;
    use rust_decimal_macros::dec;

    fn entry(
        date: (i32, u32, u32),
        activity: &str,
        op: OperationType,
        amount: Decimal,
    ) -> EntryClass {
        EntryClass {
            entry_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            activity_type: activity.to_string(),
            operation_type: op,
            amount,
        }
    }

    #[test]
    fn test_summary_groups_by_activity() {
        let entries = vec![
            entry((2026, 1, 5), "operating", OperationType::Income, dec!(1000)),
            entry((2026, 1, 6), "operating", OperationType::Expense, dec!(300)),
            entry((2026, 1, 7), "investing", OperationType::Expense, dec!(200)),
        ];
        let summary = summarize_by_activity(&entries);

        assert_eq!(summary.details.len(), 2);
        // BTreeMap ordering: "investing" < "operating"
        assert_eq!(summary.details[0].activity_type, "investing");
        assert_eq!(summary.details[0].totals.income, dec!(0));
        assert_eq!(summary.details[0].totals.expense, dec!(200));
        assert_eq!(summary.details[0].totals.net_flow, dec!(-200));

        assert_eq!(summary.details[1].activity_type, "operating");
        assert_eq!(summary.details[1].totals.income, dec!(1000));
        assert_eq!(summary.details[1].totals.expense, dec!(300));
        assert_eq!(summary.details[1].totals.net_flow, dec!(700));

        assert_eq!(summary.total.income, dec!(1000));
        assert_eq!(summary.total.expense, dec!(500));
        assert_eq!(summary.total.net_flow, dec!(500));
    }

    #[test]
    fn test_summary_magnitudes_non_negative() {
        let entries = vec![entry(
            (2026, 2, 1),
            "operating",
            OperationType::TechnicalExpense,
            dec!(75),
        )];
        let summary = summarize_by_activity(&entries);
        assert_eq!(summary.total.income, dec!(0));
        assert_eq!(summary.total.expense, dec!(75));
        assert_eq!(summary.total.net_flow, dec!(-75));
    }

    #[test]
    fn test_summary_empty() {
        let summary = summarize_by_activity(&[]);
        assert!(summary.details.is_empty());
        assert_eq!(summary.total, FlowTotals::default());
    }

    #[test]
    fn test_monthly_in_out_zero_fills() {
        let entries = vec![
            entry((2026, 1, 10), "operating", OperationType::Income, dec!(100)),
            entry((2026, 3, 10), "operating", OperationType::Expense, dec!(40)),
            entry((2025, 3, 10), "operating", OperationType::Income, dec!(999)), // other year
        ];
        let months = monthly_in_out(&entries, 2026);

        assert_eq!(months.len(), 12);
        assert_eq!(months[0].totals.income, dec!(100));
        assert_eq!(months[1].totals, FlowTotals::default());
        assert_eq!(months[2].totals.expense, dec!(40));
        assert!(months[3..].iter().all(|m| m.totals == FlowTotals::default()));
    }

    #[test]
    fn test_trailing_12_months_spans_year_boundary() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        let months = trailing_12_months(today);

        assert_eq!(months.len(), 12);
        assert_eq!(months.first(), Some(&(2025, 4)));
        assert_eq!(months.last(), Some(&(2026, 3)));
    }

    #[test]
    fn test_pivot_zero_fills_and_signs() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        let entries = vec![
            entry((2026, 2, 1), "operating", OperationType::Income, dec!(500)),
            entry((2026, 2, 2), "operating", OperationType::Expense, dec!(120)),
            entry((2025, 6, 1), "investing", OperationType::Expense, dec!(50)),
            entry((2024, 1, 1), "operating", OperationType::Income, dec!(9999)), // outside window
        ];
        let pivot = pivot_last_12_months(&entries, today);

        assert_eq!(pivot.activity_types, vec!["investing", "operating"]);
        assert_eq!(pivot.periods.len(), 12);

        let feb = pivot
            .periods
            .iter()
            .find(|p| (p.year, p.month) == (2026, 2))
            .unwrap();
        assert_eq!(feb.net_flows, vec![dec!(0), dec!(380)]);
        assert_eq!(feb.total, dec!(380));

        let jun = pivot
            .periods
            .iter()
            .find(|p| (p.year, p.month) == (2025, 6))
            .unwrap();
        assert_eq!(jun.net_flows, vec![dec!(-50), dec!(0)]);

        let empty = pivot
            .periods
            .iter()
            .find(|p| (p.year, p.month) == (2025, 12))
            .unwrap();
        assert_eq!(empty.total, dec!(0));
    }
}
