//! Cashflow reporting repository.
//!
//! Loads classified entry projections and hands them to the pure
//! aggregators: per-activity summaries, monthly in/out for a year, and
//! the trailing-12-month pivot.

use chrono::{Datelike, NaiveDate};
use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

use ledgerly_core::cashflow::{
    monthly_in_out, pivot_last_12_months, summarize_by_activity, CashflowSummary, EntryClass,
    EntryFilter, MonthlyInOut, Pivot12Report, ReportingPeriod,
};

use crate::entities::categories;
use crate::repositories::ledger::{filtered_entries, LedgerError};

/// Cashflow reporting repository.
#[derive(Debug, Clone)]
pub struct CashflowRepository {
    db: DatabaseConnection,
}

impl CashflowRepository {
    /// Creates a new cashflow repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Summarizes the matching entries by activity type.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn summary(
        &self,
        company_id: Uuid,
        filter: &EntryFilter,
        today: NaiveDate,
    ) -> Result<CashflowSummary, LedgerError> {
        let entries = self.entry_classes(company_id, filter, today).await?;
        Ok(summarize_by_activity(&entries))
    }

    /// Income and expense per month of `year`, zero-filled.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn monthly_in_out(
        &self,
        company_id: Uuid,
        year: i32,
        today: NaiveDate,
    ) -> Result<Vec<MonthlyInOut>, LedgerError> {
        let filter = EntryFilter {
            period: Some(ReportingPeriod::Custom {
                start: NaiveDate::from_ymd_opt(year, 1, 1),
                end: NaiveDate::from_ymd_opt(year, 12, 31),
            }),
            ..Default::default()
        };
        let entries = self.entry_classes(company_id, &filter, today).await?;
        Ok(monthly_in_out(&entries, year))
    }

    /// Net flow per activity type over the trailing 12 months.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn pivot_last_12_months(
        &self,
        company_id: Uuid,
        today: NaiveDate,
    ) -> Result<Pivot12Report, LedgerError> {
        // Bound the load to the pivot's window; the aggregator drops
        // anything outside it anyway.
        let window_start = today
            .with_day(1)
            .unwrap_or(today)
            .checked_sub_months(chrono::Months::new(11));
        let filter = EntryFilter {
            period: Some(ReportingPeriod::Custom {
                start: window_start,
                end: Some(today),
            }),
            ..Default::default()
        };
        let entries = self.entry_classes(company_id, &filter, today).await?;
        Ok(pivot_last_12_months(&entries, today))
    }

    /// Loads the matching entries as classification projections.
    async fn entry_classes(
        &self,
        company_id: Uuid,
        filter: &EntryFilter,
        today: NaiveDate,
    ) -> Result<Vec<EntryClass>, LedgerError> {
        let rows = filtered_entries(company_id, filter, today)
            .find_also_related(categories::Entity)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(entry, category)| {
                category.map(|c| EntryClass {
                    entry_date: entry.entry_date,
                    activity_type: c.activity_type,
                    operation_type: c.operation_type.into(),
                    amount: entry.amount,
                })
            })
            .collect())
    }
}
