//! Order domain types for item creation, mutation, and refunds.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order status, derived from the statuses of the order's line items.
///
/// Never set independently in steady state: after every item mutation the
/// status is recomputed as pending if any item is pending, completed if
/// all items are paid, and cancelled otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// At least one line item is still pending.
    Pending,
    /// Every line item has been paid.
    Completed,
    /// No pending items remain and not all are paid.
    Cancelled,
}

/// Line-item status lifecycle.
///
/// `Pending -> Paid` mirrors a sales ledger entry; `Paid -> Deleted`
/// removes it. `Deleted` items are excluded from the order total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderItemStatus {
    /// Item awaits payment.
    Pending,
    /// Item has been paid; a sales ledger entry exists for it.
    Paid,
    /// Item was cancelled before payment.
    Cancelled,
    /// Item was soft-deleted; excluded from totals.
    Deleted,
}

impl OrderItemStatus {
    /// Returns true if the item counts toward the order total.
    #[must_use]
    pub fn counts_toward_total(&self) -> bool {
        !matches!(self, Self::Deleted)
    }
}

/// Input for creating a new order line item.
#[derive(Debug, Clone)]
pub struct OrderItemInput {
    /// The order this item belongs to.
    pub order_id: Uuid,
    /// The product being sold.
    pub product_id: Uuid,
    /// Units of the product (must be positive).
    pub quantity: u32,
    /// Unit price; defaults from the product's current price when `None`.
    pub price: Option<Decimal>,
    /// Per-unit discount in money terms (0 <= discount <= price).
    pub discount: Decimal,
    /// Wallet receiving the payment; required when status is `Paid`.
    pub wallet_id: Option<Uuid>,
    /// Initial status.
    pub status: OrderItemStatus,
}

/// A partial update to an existing line item.
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ItemChange {
    /// New quantity.
    pub quantity: Option<u32>,
    /// New unit price.
    pub price: Option<Decimal>,
    /// New per-unit discount.
    pub discount: Option<Decimal>,
    /// New wallet (`Some(None)` clears it).
    pub wallet_id: Option<Option<Uuid>>,
    /// New status.
    pub status: Option<OrderItemStatus>,
}

/// Input for refunding part or all of a paid line item.
#[derive(Debug, Clone)]
pub struct RefundInput {
    /// The line item being refunded.
    pub order_item_id: Uuid,
    /// Units to refund (must be positive).
    pub refund_quantity: u32,
    /// Money to return; recorded verbatim on the refund ledger entry.
    pub refund_amount: Decimal,
    /// Wallet the money leaves from.
    pub wallet_id: Uuid,
    /// Free-form reason.
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deleted_items_excluded_from_total() {
        assert!(OrderItemStatus::Pending.counts_toward_total());
        assert!(OrderItemStatus::Paid.counts_toward_total());
        assert!(OrderItemStatus::Cancelled.counts_toward_total());
        assert!(!OrderItemStatus::Deleted.counts_toward_total());
    }
}
