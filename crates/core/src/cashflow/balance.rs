//! Wallet balance derivation.

use rust_decimal::Decimal;

use super::types::OperationType;

/// Returns the entry's contribution to a balance: `+amount` for
/// income-like categories, `-amount` otherwise.
#[must_use]
pub fn signed_amount(operation_type: OperationType, amount: Decimal) -> Decimal {
    if operation_type.is_income_like() {
        amount
    } else {
        -amount
    }
}

/// Derives a wallet's balance as the signed sum of its entries.
///
/// The balance is never stored; callers pass the wallet's current
/// entries and get the authoritative value back.
#[must_use]
pub fn wallet_balance<I>(entries: I) -> Decimal
where
    I: IntoIterator<Item = (OperationType, Decimal)>,
{
    entries
        .into_iter()
        .map(|(op, amount)| signed_amount(op, amount))
        .sum()
}
