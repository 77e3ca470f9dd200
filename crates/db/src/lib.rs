//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for every company-scoped table
//! - Repository abstractions that orchestrate "mutate, mirror, recalc"
//!   inside one database transaction
//! - Database migrations
//! - The tenant connection wrapper for row-level security

pub mod entities;
pub mod migration;
pub mod repositories;
pub mod tenant;

pub use repositories::{
    BookingRepository, CashflowRepository, CatalogRepository, CompanyRepository, LedgerRepository,
    OrderRepository, WalletRepository,
};

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

use ledgerly_shared::config::DatabaseConfig;

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Establishes a pooled connection using the application configuration.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections);
    Database::connect(options).await
}
