//! Integration tests for the booking repository.
//!
//! These tests need a real `PostgreSQL` database; they are skipped when
//! `DATABASE_URL` is not set.

use std::env;

use chrono::{DateTime, Duration, Utc};
use rust_decimal_macros::dec;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use ledgerly_core::booking::BookingStatus;
use ledgerly_core::orders::{OrderItemInput, OrderItemStatus};
use ledgerly_db::entities::sea_orm_active_enums as db_enums;
use ledgerly_db::migration::{Migrator, MigratorTrait};
use ledgerly_db::repositories::{
    BookingRepository, CatalogRepository, CompanyRepository, CreateBookingInput,
    CreateCompanyInput, OrderRepository, WalletRepository,
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
    product_id: Uuid,
}

async fn fixture(db: &DatabaseConnection) -> Fixture {
    let suffix = Uuid::new_v4();
    let company = CompanyRepository::new(db.clone())
        .create_company(CreateCompanyInput {
            name: format!("Booking Co {suffix}"),
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

    let product = CatalogRepository::new(db.clone())
        .create_product(company.id, "Massage", Some(dec!(80)))
        .await
        .expect("create product");

    Fixture {
        company_id: company.id,
        wallet_id: wallet.id,
        product_id: product.id,
    }
}

fn item(f: &Fixture, order_id: Uuid, quantity: u32, status: OrderItemStatus) -> OrderItemInput {
    let wallet_id = (status == OrderItemStatus::Paid).then_some(f.wallet_id);
    OrderItemInput {
        order_id,
        product_id: f.product_id,
        quantity,
        price: None,
        discount: dec!(0),
        wallet_id,
        status,
    }
}

fn booking_input(order_id: Uuid) -> CreateBookingInput {
    CreateBookingInput {
        order_id,
        start_at: None,
        end_at: None,
        items: None,
    }
}

#[tokio::test]
async fn test_default_items_cover_non_deleted_order_items() {
    let Some(db) = connect().await else { return };
    let f = fixture(&db).await;
    let orders = OrderRepository::new(db.clone());
    let bookings = BookingRepository::new(db.clone());

    let order = orders.create_order(f.company_id, None).await.expect("order");
    orders
        .create_item(f.company_id, item(&f, order.id, 3, OrderItemStatus::Paid))
        .await
        .expect("paid item");
    orders
        .create_item(f.company_id, item(&f, order.id, 1, OrderItemStatus::Pending))
        .await
        .expect("pending item");
    let doomed = orders
        .create_item(f.company_id, item(&f, order.id, 2, OrderItemStatus::Pending))
        .await
        .expect("third item");
    orders
        .delete_item(f.company_id, doomed.id)
        .await
        .expect("delete item");

    let booking = bookings
        .create_booking(f.company_id, booking_input(order.id))
        .await
        .expect("booking");

    // One pending booking item per live order item, at full quantity;
    // the deleted item gets nothing.
    assert_eq!(booking.items.len(), 2);
    assert!(booking
        .items
        .iter()
        .all(|i| i.status == db_enums::BookingStatus::Pending));
    let quantities: Vec<i32> = booking.items.iter().map(|i| i.quantity).collect();
    assert_eq!(quantities, vec![3, 1]);
    assert_eq!(booking.booking.status, db_enums::BookingStatus::Pending);
}

#[tokio::test]
async fn test_item_status_propagates_weakest_to_booking() {
    let Some(db) = connect().await else { return };
    let f = fixture(&db).await;
    let orders = OrderRepository::new(db.clone());
    let bookings = BookingRepository::new(db.clone());

    let order = orders.create_order(f.company_id, None).await.expect("order");
    orders
        .create_item(f.company_id, item(&f, order.id, 1, OrderItemStatus::Paid))
        .await
        .expect("first item");
    orders
        .create_item(f.company_id, item(&f, order.id, 1, OrderItemStatus::Paid))
        .await
        .expect("second item");

    let booking = bookings
        .create_booking(f.company_id, booking_input(order.id))
        .await
        .expect("booking");
    assert_eq!(booking.items.len(), 2);
    let (first, second) = (booking.items[0].id, booking.items[1].id);

    bookings
        .set_item_status(f.company_id, first, BookingStatus::Completed)
        .await
        .expect("set status");
    let loaded = bookings
        .get_booking(f.company_id, booking.booking.id)
        .await
        .expect("get");
    // The other item is still pending, so the booking is too.
    assert_eq!(loaded.booking.status, db_enums::BookingStatus::Pending);

    bookings
        .set_item_status(f.company_id, second, BookingStatus::Confirmed)
        .await
        .expect("set status");
    let loaded = bookings
        .get_booking(f.company_id, booking.booking.id)
        .await
        .expect("get");
    assert_eq!(loaded.booking.status, db_enums::BookingStatus::Confirmed);

    bookings
        .set_item_status(f.company_id, second, BookingStatus::Completed)
        .await
        .expect("set status");
    let loaded = bookings
        .get_booking(f.company_id, booking.booking.id)
        .await
        .expect("get");
    assert_eq!(loaded.booking.status, db_enums::BookingStatus::Completed);
}

#[tokio::test]
async fn test_zero_item_booking_keeps_status() {
    let Some(db) = connect().await else { return };
    let f = fixture(&db).await;
    let bookings = BookingRepository::new(db.clone());

    let order = OrderRepository::new(db.clone())
        .create_order(f.company_id, None)
        .await
        .expect("order");

    // An order with no items expands to a booking with no items.
    let booking = bookings
        .create_booking(f.company_id, booking_input(order.id))
        .await
        .expect("booking");
    assert!(booking.items.is_empty());
    assert_eq!(booking.booking.status, db_enums::BookingStatus::Pending);

    // Recalculation over zero items is a no-op, not an error.
    let recalced = bookings
        .recalc_booking(f.company_id, booking.booking.id)
        .await
        .expect("recalc");
    assert_eq!(recalced.status, db_enums::BookingStatus::Pending);
}

#[tokio::test]
async fn test_effective_window_falls_back_to_booking() {
    let Some(db) = connect().await else { return };
    let f = fixture(&db).await;
    let orders = OrderRepository::new(db.clone());
    let bookings = BookingRepository::new(db.clone());

    let order = orders.create_order(f.company_id, None).await.expect("order");
    orders
        .create_item(f.company_id, item(&f, order.id, 1, OrderItemStatus::Pending))
        .await
        .expect("item");

    let booking = bookings
        .create_booking(f.company_id, booking_input(order.id))
        .await
        .expect("booking");

    // Second precision so the value round-trips through the database.
    let start = DateTime::from_timestamp(Utc::now().timestamp() + 3600, 0).expect("timestamp");
    let end = start + Duration::hours(1);
    bookings
        .set_window(f.company_id, booking.booking.id, Some(start), Some(end))
        .await
        .expect("set window");

    let loaded = bookings
        .get_booking(f.company_id, booking.booking.id)
        .await
        .expect("get");
    let (item_start, item_end) = loaded.effective_window(&loaded.items[0]);
    assert_eq!(item_start, Some(start));
    assert_eq!(item_end, Some(end));
}
