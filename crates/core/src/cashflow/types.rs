//! Cashflow domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Classification of a category, the sole determinant of sign when
/// aggregating ledger entries.
///
/// Technical variants mark internal movements (e.g. transfers between
/// wallets) that should aggregate like their plain counterparts but can
/// be told apart in reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    /// Money coming in.
    Income,
    /// Money going out.
    Expense,
    /// Internal inbound movement.
    TechnicalIncome,
    /// Internal outbound movement.
    TechnicalExpense,
}

impl OperationType {
    /// Returns true if entries of this type add to a wallet's balance.
    #[must_use]
    pub const fn is_income_like(self) -> bool {
        matches!(self, Self::Income | Self::TechnicalIncome)
    }
}

/// The entity that produced a ledger entry.
///
/// Replaces the original's generic "reason" reference with a closed sum
/// type, so the ledger can only ever point at entities it knows how to
/// reconcile against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "id")]
pub enum EntryReason {
    /// A paid order line item (sales entry).
    OrderItem(Uuid),
    /// A refund of an order line item (refund entry).
    Refund(Uuid),
}

/// The slice of a ledger entry the aggregators care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryClass {
    /// Entry date.
    pub entry_date: NaiveDate,
    /// The category's activity type (e.g. "operating").
    pub activity_type: String,
    /// The category's operation type.
    pub operation_type: OperationType,
    /// Entry magnitude (always non-negative; sign implied by type).
    pub amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_income_like_classification() {
        assert!(OperationType::Income.is_income_like());
        assert!(OperationType::TechnicalIncome.is_income_like());
        assert!(!OperationType::Expense.is_income_like());
        assert!(!OperationType::TechnicalExpense.is_income_like());
    }

    #[test]
    fn test_reason_serde_shape() {
        let reason = EntryReason::OrderItem(Uuid::nil());
        let json = serde_json::to_value(&reason).unwrap();
        assert_eq!(json["type"], "order_item");
    }
}
