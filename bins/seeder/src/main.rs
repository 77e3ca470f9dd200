//! Database seeder for Ledgerly development and testing.
//!
//! Seeds a demo company with wallets, categories, products, clients,
//! an order with paid items, and a booking for local development.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use tracing::info;

use ledgerly_core::orders::{OrderItemInput, OrderItemStatus};
use ledgerly_db::entities::sea_orm_active_enums::OperationType;
use ledgerly_db::repositories::{
    BookingRepository, CatalogRepository, CompanyRepository, CreateBookingInput,
    CreateCompanyInput, OrderRepository, WalletRepository,
};
use ledgerly_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;
    let db = ledgerly_db::connect_with(&config.database)
        .await
        .context("failed to connect to database")?;

    let companies = CompanyRepository::new(db.clone());
    if companies.find_by_subdomain("demo").await?.is_some() {
        info!("demo company already seeded, nothing to do");
        return Ok(());
    }

    info!("seeding demo company");
    let company = companies
        .create_company(CreateCompanyInput {
            name: "Demo Barbershop".to_string(),
            subdomain: Some("demo".to_string()),
            billing_plan: "free".to_string(),
            owner_id: uuid::Uuid::new_v4(),
        })
        .await?;

    let wallets = WalletRepository::new(db.clone());
    let cash = wallets.create_wallet(company.id, "Cash").await?;
    wallets.create_wallet(company.id, "Bank").await?;

    let catalog = CatalogRepository::new(db.clone());
    catalog
        .create_category(company.id, "Rent", OperationType::Expense, "operating")
        .await?;
    catalog
        .create_category(
            company.id,
            "Equipment",
            OperationType::Expense,
            "investing",
        )
        .await?;

    let haircut = catalog
        .create_product(company.id, "Haircut", Some(Decimal::new(10000, 2)))
        .await?;
    let beard_trim = catalog
        .create_product(company.id, "Beard trim", Some(Decimal::new(4000, 2)))
        .await?;

    let client = catalog
        .create_client(
            company.id,
            "Ada Wong",
            Some("+1-555-0100".to_string()),
            None,
        )
        .await?;

    info!("seeding demo order");
    let orders = OrderRepository::new(db.clone());
    let order = orders.create_order(company.id, Some(client.id)).await?;
    orders
        .create_item(
            company.id,
            OrderItemInput {
                order_id: order.id,
                product_id: haircut.id,
                quantity: 1,
                price: None,
                discount: Decimal::ZERO,
                wallet_id: Some(cash.id),
                status: OrderItemStatus::Paid,
            },
        )
        .await?;
    orders
        .create_item(
            company.id,
            OrderItemInput {
                order_id: order.id,
                product_id: beard_trim.id,
                quantity: 1,
                price: None,
                discount: Decimal::new(500, 2),
                wallet_id: None,
                status: OrderItemStatus::Pending,
            },
        )
        .await?;

    info!("seeding demo booking");
    let start = Utc::now() + Duration::days(1);
    BookingRepository::new(db.clone())
        .create_booking(
            company.id,
            CreateBookingInput {
                order_id: order.id,
                start_at: Some(start),
                end_at: Some(start + Duration::hours(1)),
                items: None,
            },
        )
        .await?;

    info!(company_id = %company.id, "seeding complete");
    Ok(())
}
