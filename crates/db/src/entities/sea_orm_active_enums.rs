//! Database-side enums mapped to `PostgreSQL` enum types.
//!
//! Each enum converts to and from its `ledgerly-core` counterpart so
//! the core crate stays free of database dependencies.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use ledgerly_core::booking::BookingStatus as CoreBookingStatus;
use ledgerly_core::cashflow::OperationType as CoreOperationType;
use ledgerly_core::orders::{
    OrderItemStatus as CoreOrderItemStatus, OrderStatus as CoreOrderStatus,
};

/// Direction of money movement for a category.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "operation_type")]
pub enum OperationType {
    /// Money flowing in.
    #[sea_orm(string_value = "income")]
    Income,
    /// Money flowing out.
    #[sea_orm(string_value = "expense")]
    Expense,
    /// Inflow excluded from business performance views.
    #[sea_orm(string_value = "technical_income")]
    TechnicalIncome,
    /// Outflow excluded from business performance views.
    #[sea_orm(string_value = "technical_expense")]
    TechnicalExpense,
}

impl From<CoreOperationType> for OperationType {
    fn from(value: CoreOperationType) -> Self {
        match value {
            CoreOperationType::Income => Self::Income,
            CoreOperationType::Expense => Self::Expense,
            CoreOperationType::TechnicalIncome => Self::TechnicalIncome,
            CoreOperationType::TechnicalExpense => Self::TechnicalExpense,
        }
    }
}

impl From<OperationType> for CoreOperationType {
    fn from(value: OperationType) -> Self {
        match value {
            OperationType::Income => Self::Income,
            OperationType::Expense => Self::Expense,
            OperationType::TechnicalIncome => Self::TechnicalIncome,
            OperationType::TechnicalExpense => Self::TechnicalExpense,
        }
    }
}

/// Derived status of an order.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "order_status")]
pub enum OrderStatus {
    /// At least one item is still pending, or the order has no items.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Every counted item is paid.
    #[sea_orm(string_value = "completed")]
    Completed,
    /// No pending items and not all paid.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl From<CoreOrderStatus> for OrderStatus {
    fn from(value: CoreOrderStatus) -> Self {
        match value {
            CoreOrderStatus::Pending => Self::Pending,
            CoreOrderStatus::Completed => Self::Completed,
            CoreOrderStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<OrderStatus> for CoreOrderStatus {
    fn from(value: OrderStatus) -> Self {
        match value {
            OrderStatus::Pending => Self::Pending,
            OrderStatus::Completed => Self::Completed,
            OrderStatus::Cancelled => Self::Cancelled,
        }
    }
}

/// Lifecycle status of an order item.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "order_item_status")]
pub enum OrderItemStatus {
    /// Awaiting payment.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Paid; mirrored into the cashflow ledger.
    #[sea_orm(string_value = "paid")]
    Paid,
    /// Cancelled but still counted toward the order total.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    /// Soft-deleted; excluded from the order total.
    #[sea_orm(string_value = "deleted")]
    Deleted,
}

impl From<CoreOrderItemStatus> for OrderItemStatus {
    fn from(value: CoreOrderItemStatus) -> Self {
        match value {
            CoreOrderItemStatus::Pending => Self::Pending,
            CoreOrderItemStatus::Paid => Self::Paid,
            CoreOrderItemStatus::Cancelled => Self::Cancelled,
            CoreOrderItemStatus::Deleted => Self::Deleted,
        }
    }
}

impl From<OrderItemStatus> for CoreOrderItemStatus {
    fn from(value: OrderItemStatus) -> Self {
        match value {
            OrderItemStatus::Pending => Self::Pending,
            OrderItemStatus::Paid => Self::Paid,
            OrderItemStatus::Cancelled => Self::Cancelled,
            OrderItemStatus::Deleted => Self::Deleted,
        }
    }
}

/// Status of a booking or booking item.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "booking_status")]
pub enum BookingStatus {
    /// Not yet confirmed.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Confirmed but not finished.
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    /// Finished.
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Called off.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl From<CoreBookingStatus> for BookingStatus {
    fn from(value: CoreBookingStatus) -> Self {
        match value {
            CoreBookingStatus::Pending => Self::Pending,
            CoreBookingStatus::Confirmed => Self::Confirmed,
            CoreBookingStatus::Completed => Self::Completed,
            CoreBookingStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<BookingStatus> for CoreBookingStatus {
    fn from(value: BookingStatus) -> Self {
        match value {
            BookingStatus::Pending => Self::Pending,
            BookingStatus::Confirmed => Self::Confirmed,
            BookingStatus::Completed => Self::Completed,
            BookingStatus::Cancelled => Self::Cancelled,
        }
    }
}

/// What caused a mirrored ledger entry to exist.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entry_reason_type")]
pub enum EntryReasonType {
    /// Mirrors a paid order item.
    #[sea_orm(string_value = "order_item")]
    OrderItem,
    /// Mirrors a refund.
    #[sea_orm(string_value = "refund")]
    Refund,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_type_round_trip() {
        for op in [
            CoreOperationType::Income,
            CoreOperationType::Expense,
            CoreOperationType::TechnicalIncome,
            CoreOperationType::TechnicalExpense,
        ] {
            assert_eq!(CoreOperationType::from(OperationType::from(op)), op);
        }
    }

    #[test]
    fn test_item_status_round_trip() {
        for status in [
            CoreOrderItemStatus::Pending,
            CoreOrderItemStatus::Paid,
            CoreOrderItemStatus::Cancelled,
            CoreOrderItemStatus::Deleted,
        ] {
            assert_eq!(
                CoreOrderItemStatus::from(OrderItemStatus::from(status)),
                status
            );
        }
    }
}
