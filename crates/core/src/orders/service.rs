//! Order service: pricing, derived fields, and mutation validation.
//!
//! Every function here is a pure function of its inputs. The database
//! layer fetches the rows, calls in, and persists the outcome inside one
//! transaction, so recalculation stays idempotent and re-runnable as a
//! repair tool.

use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::OrderError;
use super::types::{OrderItemStatus, OrderStatus, RefundInput};

/// Largest quantity the storage column can hold.
pub const MAX_QUANTITY: u32 = i32::MAX.unsigned_abs();

/// A line item as seen by the pricing and status rules.
#[derive(Debug, Clone, Copy)]
pub struct ItemSnapshot {
    /// Current item status.
    pub status: OrderItemStatus,
    /// Units purchased.
    pub quantity: u32,
    /// Unit price.
    pub price: Decimal,
    /// Per-unit discount.
    pub discount: Decimal,
}

/// What a status transition means for the item's mirrored ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerEffect {
    /// Upsert exactly one sales entry keyed by the item.
    UpsertSales,
    /// Remove the item's sales entry if present.
    Remove,
}

/// Stateless order business logic.
pub struct OrderService;

impl OrderService {
    /// Calculates a line item's amount: `quantity * max(price - discount, 0)`.
    ///
    /// Never negative. A discount greater than the price is rejected at
    /// validation time; the floor here only guards already-invalid rows.
    #[must_use]
    pub fn item_amount(quantity: u32, price: Decimal, discount: Decimal) -> Decimal {
        let net_price = (price - discount).max(Decimal::ZERO);
        Decimal::from(quantity) * net_price
    }

    /// Sums item amounts over all items except soft-deleted ones.
    #[must_use]
    pub fn order_total(items: &[ItemSnapshot]) -> Decimal {
        items
            .iter()
            .filter(|i| i.status.counts_toward_total())
            .map(|i| Self::item_amount(i.quantity, i.price, i.discount))
            .sum()
    }

    /// Derives the order status from its item statuses.
    ///
    /// Soft-deleted items are ignored here exactly as they are in the
    /// total. Of the rest: pending if any item is pending; completed if
    /// non-empty and every item is paid; cancelled otherwise. An order
    /// with no live items stays pending (it was just created, or every
    /// item was deleted again).
    #[must_use]
    pub fn derive_order_status(statuses: &[OrderItemStatus]) -> OrderStatus {
        let live: Vec<OrderItemStatus> = statuses
            .iter()
            .copied()
            .filter(|s| *s != OrderItemStatus::Deleted)
            .collect();
        if live.is_empty() {
            return OrderStatus::Pending;
        }
        if live.contains(&OrderItemStatus::Pending) {
            return OrderStatus::Pending;
        }
        if live.iter().all(|s| *s == OrderItemStatus::Paid) {
            return OrderStatus::Completed;
        }
        OrderStatus::Cancelled
    }

    /// Validates a line item's fields before it is written.
    ///
    /// # Errors
    ///
    /// Returns `OrderError` on zero or out-of-range quantity, negative
    /// discount, a discount above the unit price, or a paid item
    /// without a wallet.
    pub fn validate_item(
        quantity: u32,
        price: Decimal,
        discount: Decimal,
        wallet_id: Option<Uuid>,
        status: OrderItemStatus,
    ) -> Result<(), OrderError> {
        if quantity == 0 {
            return Err(OrderError::ZeroQuantity);
        }
        if quantity > MAX_QUANTITY {
            return Err(OrderError::QuantityTooLarge(quantity));
        }
        if discount < Decimal::ZERO {
            return Err(OrderError::NegativeDiscount);
        }
        if discount > price {
            return Err(OrderError::DiscountExceedsPrice { discount, price });
        }
        if status == OrderItemStatus::Paid && wallet_id.is_none() {
            return Err(OrderError::PaidWithoutWallet);
        }
        Ok(())
    }

    /// Maps an item status to its effect on the mirrored ledger entry.
    ///
    /// Paid items carry exactly one sales entry; every other status
    /// carries none. Removal is a no-op when no entry exists, so the
    /// mapping is safe to apply after arbitrary transitions, including
    /// paid back to pending.
    #[must_use]
    pub fn ledger_effect(status: OrderItemStatus) -> LedgerEffect {
        match status {
            OrderItemStatus::Paid => LedgerEffect::UpsertSales,
            OrderItemStatus::Pending | OrderItemStatus::Cancelled | OrderItemStatus::Deleted => {
                LedgerEffect::Remove
            }
        }
    }

    /// Validates a refund against the parent item's state.
    ///
    /// The cumulative check (`already_refunded`) closes a gap where
    /// several individually-valid refunds could together exceed the
    /// purchased quantity.
    ///
    /// # Errors
    ///
    /// Returns `OrderError` if the item is not paid, the quantity or
    /// amount is non-positive, or the refund would exceed what remains.
    pub fn validate_refund(
        item_status: OrderItemStatus,
        purchased_quantity: u32,
        already_refunded: u32,
        input: &RefundInput,
    ) -> Result<(), OrderError> {
        if item_status != OrderItemStatus::Paid {
            return Err(OrderError::RefundOnUnpaidItem);
        }
        if input.refund_quantity == 0 {
            return Err(OrderError::ZeroRefundQuantity);
        }
        if input.refund_amount <= Decimal::ZERO {
            return Err(OrderError::NonPositiveRefundAmount);
        }
        let remaining = purchased_quantity.saturating_sub(already_refunded);
        if input.refund_quantity > remaining {
            return Err(OrderError::RefundExceedsQuantity {
                requested: input.refund_quantity,
                remaining,
                purchased: purchased_quantity,
                already_refunded,
            });
        }
        Ok(())
    }
}
