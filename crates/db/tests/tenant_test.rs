//! Integration tests for the tenant context.
//!
//! These tests need a real `PostgreSQL` database; they are skipped when
//! `DATABASE_URL` is not set.

use std::env;

use sea_orm::DatabaseConnection;
use uuid::Uuid;

use ledgerly_core::orders::OrderError;
use ledgerly_db::migration::{Migrator, MigratorTrait};
use ledgerly_db::repositories::{
    CompanyRepository, CreateCompanyInput, OrderRepoError, OrderRepository,
};
use ledgerly_db::tenant::{self, TenantConnection, TenantExt};

async fn connect() -> Option<DatabaseConnection> {
    let url = env::var("DATABASE_URL").ok()?;
    let db = ledgerly_db::connect(&url).await.expect("connect failed");
    Migrator::up(&db, None).await.expect("migration failed");
    Some(db)
}

async fn create_company(db: &DatabaseConnection, name: &str) -> Uuid {
    CompanyRepository::new(db.clone())
        .create_company(CreateCompanyInput {
            name: format!("{name} {}", Uuid::new_v4()),
            subdomain: None,
            billing_plan: "free".to_string(),
            owner_id: Uuid::new_v4(),
        })
        .await
        .expect("create company")
        .id
}

#[tokio::test]
async fn test_context_is_transaction_scoped() {
    let Some(db) = connect().await else { return };
    let company_id = Uuid::new_v4();

    let conn = TenantConnection::begin(&db, company_id).await.expect("begin");
    assert_eq!(conn.company_id(), company_id);
    let seen = tenant::current_context(conn.transaction()).await.expect("read");
    assert_eq!(seen, Some(company_id));
    conn.rollback().await.expect("rollback");

    // Outside the transaction the setting is gone.
    let seen = tenant::current_context(&db).await.expect("read");
    assert_eq!(seen, None);
}

#[tokio::test]
async fn test_begin_tenant_sets_context() {
    let Some(db) = connect().await else { return };
    let company_id = Uuid::new_v4();

    let txn = db.begin_tenant(company_id).await.expect("begin");
    let seen = tenant::current_context(&txn).await.expect("read");
    assert_eq!(seen, Some(company_id));
    txn.rollback().await.expect("rollback");
}

#[tokio::test]
async fn test_foreign_order_reads_as_not_found() {
    let Some(db) = connect().await else { return };
    let company_a = create_company(&db, "Tenant A").await;
    let company_b = create_company(&db, "Tenant B").await;
    let repo = OrderRepository::new(db.clone());

    let order = repo.create_order(company_a, None).await.expect("order");

    // Another company's order is indistinguishable from a missing one.
    let result = repo.get_order(company_b, order.id).await;
    assert!(matches!(
        result,
        Err(OrderRepoError::Domain(OrderError::OrderNotFound(_)))
    ));
}
