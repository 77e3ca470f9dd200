//! Property-based tests for OrderService.
//!
//! - Property 1: Item amounts are never negative
//! - Property 2: Order totals equal the sum over non-deleted items
//! - Property 3: Status derivation and totals are idempotent

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::{ItemSnapshot, OrderService};
use super::types::OrderItemStatus;

/// Strategy to generate money values (0.00 to 10,000.00).
fn money() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate an item status.
fn status_strategy() -> impl Strategy<Value = OrderItemStatus> {
    prop_oneof![
        Just(OrderItemStatus::Pending),
        Just(OrderItemStatus::Paid),
        Just(OrderItemStatus::Cancelled),
        Just(OrderItemStatus::Deleted),
    ]
}

/// Strategy to generate a line item snapshot.
fn item_strategy() -> impl Strategy<Value = ItemSnapshot> {
    (status_strategy(), 1u32..100, money(), money()).prop_map(
        |(status, quantity, price, discount)| ItemSnapshot {
            status,
            quantity,
            price,
            discount,
        },
    )
}

proptest! {
    /// Item amounts never go negative, even for invalid discounts.
    #[test]
    fn prop_item_amount_never_negative(
        quantity in 0u32..1000,
        price in money(),
        discount in money(),
    ) {
        let amount = OrderService::item_amount(quantity, price, discount);
        prop_assert!(amount >= Decimal::ZERO);
    }

    /// When the discount fits within the price, the amount is exact.
    #[test]
    fn prop_item_amount_exact_when_valid(
        quantity in 1u32..1000,
        price in money(),
        discount in money(),
    ) {
        prop_assume!(discount <= price);
        let amount = OrderService::item_amount(quantity, price, discount);
        prop_assert_eq!(amount, Decimal::from(quantity) * (price - discount));
    }

    /// The order total equals the sum of non-deleted item amounts.
    #[test]
    fn prop_order_total_matches_sum(items in prop::collection::vec(item_strategy(), 0..12)) {
        let total = OrderService::order_total(&items);
        let expected: Decimal = items
            .iter()
            .filter(|i| i.status != OrderItemStatus::Deleted)
            .map(|i| OrderService::item_amount(i.quantity, i.price, i.discount))
            .sum();
        prop_assert_eq!(total, expected);
        prop_assert!(total >= Decimal::ZERO);
    }

    /// Recalculation with no intervening mutation is idempotent.
    #[test]
    fn prop_recalc_idempotent(items in prop::collection::vec(item_strategy(), 0..12)) {
        let statuses: Vec<_> = items.iter().map(|i| i.status).collect();

        prop_assert_eq!(
            OrderService::order_total(&items),
            OrderService::order_total(&items)
        );
        prop_assert_eq!(
            OrderService::derive_order_status(&statuses),
            OrderService::derive_order_status(&statuses)
        );
    }
}
