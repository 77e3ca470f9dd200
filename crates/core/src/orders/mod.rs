//! Order and line-item consistency rules.
//!
//! An order's `total_amount` and `status` are derived fields: they must
//! always equal a pure function of the order's non-deleted line items.
//! This module holds those pure functions plus the validation rules for
//! item mutations and refunds. Persistence and orchestration live in the
//! database layer, which calls into here.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::OrderError;
pub use service::{ItemSnapshot, LedgerEffect, OrderService, MAX_QUANTITY};
pub use types::{ItemChange, OrderItemInput, OrderItemStatus, OrderStatus, RefundInput};
