//! `SeaORM` entity definitions.

pub mod sea_orm_active_enums;

pub mod booking_items;
pub mod bookings;
pub mod categories;
pub mod clients;
pub mod companies;
pub mod ledger_entries;
pub mod order_item_refunds;
pub mod order_items;
pub mod orders;
pub mod products;
pub mod wallets;
