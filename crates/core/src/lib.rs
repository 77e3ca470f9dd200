//! Core business logic for Ledgerly.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and calculations
//! live here.
//!
//! # Modules
//!
//! - `orders` - Order/line-item pricing and derived total/status rules
//! - `booking` - Booking status propagation from booking items
//! - `cashflow` - Ledger entry classification, balances, and summaries
//! - `company` - Tenant (company) validation rules

pub mod booking;
pub mod cashflow;
pub mod company;
pub mod orders;
