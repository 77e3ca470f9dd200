//! Integration tests for ledger, wallet balance, and reporting
//! repositories.
//!
//! These tests need a real `PostgreSQL` database; they are skipped when
//! `DATABASE_URL` is not set.

use std::env;

use chrono::Utc;
use rust_decimal_macros::dec;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use ledgerly_core::cashflow::{EntryFilter, FlowDirection};
use ledgerly_core::orders::{OrderItemInput, OrderItemStatus};
use ledgerly_db::entities::sea_orm_active_enums::OperationType;
use ledgerly_db::migration::{Migrator, MigratorTrait};
use ledgerly_db::repositories::{
    CashflowRepository, CatalogRepository, CompanyRepository, CreateCompanyInput,
    CreateEntryInput, LedgerRepository, OrderRepository, WalletRepository,
};

async fn connect() -> Option<DatabaseConnection> {
    let url = env::var("DATABASE_URL").ok()?;
    let db = ledgerly_db::connect(&url).await.expect("connect failed");
    Migrator::up(&db, None).await.expect("migration failed");
    Some(db)
}

struct Fixture {
    company_id: Uuid,
    wallet_id: Uuid,
    income_category: Uuid,
    expense_category: Uuid,
}

async fn fixture(db: &DatabaseConnection) -> Fixture {
    let suffix = Uuid::new_v4();
    let company = CompanyRepository::new(db.clone())
        .create_company(CreateCompanyInput {
            name: format!("Cashflow Co {suffix}"),
            subdomain: None,
            billing_plan: "free".to_string(),
            owner_id: Uuid::new_v4(),
        })
        .await
        .expect("create company");

    let wallet = WalletRepository::new(db.clone())
        .create_wallet(company.id, "Cash")
        .await
        .expect("create wallet");

    let catalog = CatalogRepository::new(db.clone());
    let income = catalog
        .create_category(company.id, "Consulting", OperationType::Income, "operating")
        .await
        .expect("income category");
    let expense = catalog
        .create_category(company.id, "Rent", OperationType::Expense, "operating")
        .await
        .expect("expense category");

    Fixture {
        company_id: company.id,
        wallet_id: wallet.id,
        income_category: income.id,
        expense_category: expense.id,
    }
}

fn entry(f: &Fixture, category_id: Uuid, amount: rust_decimal::Decimal) -> CreateEntryInput {
    CreateEntryInput {
        wallet_id: f.wallet_id,
        category_id,
        amount,
        entry_date: Utc::now().date_naive(),
        description: Some("test entry".to_string()),
    }
}

#[tokio::test]
async fn test_wallet_balance_is_signed_sum() {
    let Some(db) = connect().await else { return };
    let f = fixture(&db).await;
    let ledger = LedgerRepository::new(db.clone());
    let today = Utc::now().date_naive();

    ledger
        .create_entry(f.company_id, entry(&f, f.income_category, dec!(1000)))
        .await
        .expect("income entry");
    ledger
        .create_entry(f.company_id, entry(&f, f.expense_category, dec!(300)))
        .await
        .expect("expense entry");

    let balance = WalletRepository::new(db.clone())
        .wallet_balance(f.company_id, f.wallet_id, &EntryFilter::default(), today)
        .await
        .expect("balance");
    assert_eq!(balance.balance, dec!(700));
}

#[tokio::test]
async fn test_balance_can_go_negative() {
    let Some(db) = connect().await else { return };
    let f = fixture(&db).await;
    let ledger = LedgerRepository::new(db.clone());
    let today = Utc::now().date_naive();

    ledger
        .create_entry(f.company_id, entry(&f, f.expense_category, dec!(50)))
        .await
        .expect("expense entry");

    let balance = WalletRepository::new(db.clone())
        .wallet_balance(f.company_id, f.wallet_id, &EntryFilter::default(), today)
        .await
        .expect("balance");
    assert_eq!(balance.balance, dec!(-50));
}

#[tokio::test]
async fn test_flow_filter_keeps_one_side() {
    let Some(db) = connect().await else { return };
    let f = fixture(&db).await;
    let ledger = LedgerRepository::new(db.clone());
    let today = Utc::now().date_naive();

    ledger
        .create_entry(f.company_id, entry(&f, f.income_category, dec!(1000)))
        .await
        .expect("income entry");
    ledger
        .create_entry(f.company_id, entry(&f, f.expense_category, dec!(300)))
        .await
        .expect("expense entry");

    let filter = EntryFilter {
        flow: Some(FlowDirection::Expense),
        ..Default::default()
    };
    let entries = ledger
        .list_entries(f.company_id, &filter, today)
        .await
        .expect("list");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].amount, dec!(300));
}

#[tokio::test]
async fn test_summary_groups_by_activity() {
    let Some(db) = connect().await else { return };
    let f = fixture(&db).await;
    let ledger = LedgerRepository::new(db.clone());
    let today = Utc::now().date_naive();

    ledger
        .create_entry(f.company_id, entry(&f, f.income_category, dec!(1000)))
        .await
        .expect("income entry");
    ledger
        .create_entry(f.company_id, entry(&f, f.expense_category, dec!(300)))
        .await
        .expect("expense entry");

    let summary = CashflowRepository::new(db.clone())
        .summary(f.company_id, &EntryFilter::default(), today)
        .await
        .expect("summary");
    assert_eq!(summary.total.income, dec!(1000));
    assert_eq!(summary.total.expense, dec!(300));
    assert_eq!(summary.total.net_flow, dec!(700));
    assert_eq!(summary.details.len(), 1);
    assert_eq!(summary.details[0].activity_type, "operating");
}

#[tokio::test]
async fn test_paid_item_mirrors_sales_entry() {
    let Some(db) = connect().await else { return };
    let f = fixture(&db).await;
    let today = Utc::now().date_naive();

    let product = CatalogRepository::new(db.clone())
        .create_product(f.company_id, "Massage", Some(dec!(80)))
        .await
        .expect("product");
    let orders = OrderRepository::new(db.clone());
    let order = orders.create_order(f.company_id, None).await.expect("order");
    let item = orders
        .create_item(
            f.company_id,
            OrderItemInput {
                order_id: order.id,
                product_id: product.id,
                quantity: 2,
                price: None,
                discount: dec!(0),
                wallet_id: Some(f.wallet_id),
                status: OrderItemStatus::Paid,
            },
        )
        .await
        .expect("item");

    // The sale lands on the wallet as income.
    let balance = WalletRepository::new(db.clone())
        .wallet_balance(f.company_id, f.wallet_id, &EntryFilter::default(), today)
        .await
        .expect("balance");
    assert_eq!(balance.balance, dec!(160));

    // Deleting the item removes its mirrored entry.
    orders
        .delete_item(f.company_id, item.id)
        .await
        .expect("delete item");
    let balance = WalletRepository::new(db.clone())
        .wallet_balance(f.company_id, f.wallet_id, &EntryFilter::default(), today)
        .await
        .expect("balance");
    assert_eq!(balance.balance, dec!(0));
}

#[tokio::test]
async fn test_mirrored_entry_cannot_be_deleted_directly() {
    let Some(db) = connect().await else { return };
    let f = fixture(&db).await;
    let today = Utc::now().date_naive();

    let product = CatalogRepository::new(db.clone())
        .create_product(f.company_id, "Trim", Some(dec!(30)))
        .await
        .expect("product");
    let orders = OrderRepository::new(db.clone());
    let order = orders.create_order(f.company_id, None).await.expect("order");
    orders
        .create_item(
            f.company_id,
            OrderItemInput {
                order_id: order.id,
                product_id: product.id,
                quantity: 1,
                price: None,
                discount: dec!(0),
                wallet_id: Some(f.wallet_id),
                status: OrderItemStatus::Paid,
            },
        )
        .await
        .expect("item");

    let ledger = LedgerRepository::new(db.clone());
    let entries = ledger
        .list_entries(f.company_id, &EntryFilter::default(), today)
        .await
        .expect("list");
    let mirrored = entries
        .iter()
        .find(|e| e.reason_type.is_some())
        .expect("mirrored entry exists");

    let result = ledger.delete_entry(f.company_id, mirrored.id).await;
    assert!(result.is_err());
}
