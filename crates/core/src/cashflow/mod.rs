//! Cashflow ledger logic: entry classification, balances, and summaries.
//!
//! A wallet's balance is never stored; it is always the signed sum of
//! the wallet's ledger entries, where the sign comes from the entry
//! category's operation type. Summaries group entries by the category's
//! activity type and by calendar month.

pub mod balance;
pub mod error;
pub mod filter;
pub mod summary;
pub mod types;

pub use balance::{signed_amount, wallet_balance};
pub use error::CashflowError;
pub use filter::{EntryFilter, FlowDirection, ReportingPeriod};
pub use summary::{
    ActivityFlow, CashflowSummary, FlowTotals, MonthlyInOut, Pivot12Report, PivotPeriod,
    monthly_in_out, pivot_last_12_months, summarize_by_activity,
};
pub use types::{EntryClass, EntryReason, OperationType};
