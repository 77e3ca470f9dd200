//! Booking repository for booking and booking item database operations.
//!
//! A booking groups scheduled items tied to one order's line items; its
//! status is always the weakest status among its items. Item status
//! changes lock the parent booking row before recomputation.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{debug, info};
use uuid::Uuid;

use ledgerly_core::booking::{BookingService, BookingStatus as CoreBookingStatus};
use ledgerly_core::orders::OrderError;

use crate::entities::{
    booking_items, bookings, order_items, orders,
    sea_orm_active_enums::{BookingStatus, OrderItemStatus},
};
use crate::tenant::TenantExt;

/// Error types for booking operations.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    /// Booking not found.
    #[error("Booking not found: {0}")]
    NotFound(Uuid),

    /// Booking item not found.
    #[error("Booking item not found: {0}")]
    ItemNotFound(Uuid),

    /// Booking item quantity exceeds what the storage column can hold.
    #[error("Quantity {0} is too large")]
    QuantityTooLarge(u32),

    /// The referenced order item belongs to a different order.
    #[error("Order item {item_id} does not belong to order {order_id}")]
    ItemNotInOrder {
        /// The offending order item.
        item_id: Uuid,
        /// The booking's order.
        order_id: Uuid,
    },

    /// Order lookup failure.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// One scheduled item of a booking being created.
#[derive(Debug, Clone)]
pub struct BookingItemSpec {
    /// The order line item being scheduled.
    pub order_item_id: Uuid,
    /// Units covered by this booking item.
    pub quantity: u32,
    /// Initial status.
    pub status: CoreBookingStatus,
    /// Own start; falls back to the booking's.
    pub start_at: Option<DateTime<Utc>>,
    /// Own end; falls back to the booking's.
    pub end_at: Option<DateTime<Utc>>,
}

/// Input for creating a booking.
#[derive(Debug, Clone)]
pub struct CreateBookingInput {
    /// The order being scheduled.
    pub order_id: Uuid,
    /// Booking-level window start.
    pub start_at: Option<DateTime<Utc>>,
    /// Booking-level window end.
    pub end_at: Option<DateTime<Utc>>,
    /// Explicit items; when `None`, one pending item is created per
    /// non-deleted order item at its full quantity.
    pub items: Option<Vec<BookingItemSpec>>,
}

/// A booking together with its items.
#[derive(Debug, Clone)]
pub struct BookingWithItems {
    /// Booking header.
    pub booking: bookings::Model,
    /// Scheduled items, oldest first.
    pub items: Vec<booking_items::Model>,
}

impl BookingWithItems {
    /// Resolves one item's effective time window, falling back to the
    /// booking's window where the item has none of its own.
    #[must_use]
    pub fn effective_window(
        &self,
        item: &booking_items::Model,
    ) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        BookingService::effective_window(
            item.start_at.map(|t| t.with_timezone(&Utc)),
            item.end_at.map(|t| t.with_timezone(&Utc)),
            self.booking.start_at.map(|t| t.with_timezone(&Utc)),
            self.booking.end_at.map(|t| t.with_timezone(&Utc)),
        )
    }
}

/// Booking repository for CRUD and status operations.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    db: DatabaseConnection,
}

impl BookingRepository {
    /// Creates a new booking repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a booking with its items and derives the initial status.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist in this company, an
    /// explicit item references a line item outside the order, or the
    /// database operation fails.
    pub async fn create_booking(
        &self,
        company_id: Uuid,
        input: CreateBookingInput,
    ) -> Result<BookingWithItems, BookingError> {
        let txn = self.db.begin_tenant(company_id).await?;

        let order = orders::Entity::find_by_id(input.order_id)
            .filter(orders::Column::CompanyId.eq(company_id))
            .one(&txn)
            .await?
            .ok_or(OrderError::OrderNotFound(input.order_id))?;

        let now = Utc::now().into();
        let booking_id = Uuid::new_v4();
        let booking = bookings::ActiveModel {
            id: Set(booking_id),
            company_id: Set(company_id),
            order_id: Set(order.id),
            start_at: Set(input.start_at.map(Into::into)),
            end_at: Set(input.end_at.map(Into::into)),
            status: Set(BookingStatus::Pending),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let booking = booking.insert(&txn).await?;

        let specs = match input.items {
            Some(specs) => specs,
            None => default_item_specs(&txn, order.id).await?,
        };

        let mut items = Vec::with_capacity(specs.len());
        for spec in specs {
            let order_item = order_items::Entity::find_by_id(spec.order_item_id)
                .filter(order_items::Column::CompanyId.eq(company_id))
                .one(&txn)
                .await?
                .ok_or(OrderError::ItemNotFound(spec.order_item_id))?;
            if order_item.order_id != order.id {
                return Err(BookingError::ItemNotInOrder {
                    item_id: spec.order_item_id,
                    order_id: order.id,
                });
            }

            let item = booking_items::ActiveModel {
                id: Set(Uuid::new_v4()),
                company_id: Set(company_id),
                booking_id: Set(booking_id),
                order_item_id: Set(order_item.id),
                quantity: Set(i32::try_from(spec.quantity)
                    .map_err(|_| BookingError::QuantityTooLarge(spec.quantity))?),
                start_at: Set(spec.start_at.map(Into::into)),
                end_at: Set(spec.end_at.map(Into::into)),
                status: Set(spec.status.into()),
                created_at: Set(now),
                updated_at: Set(now),
            };
            items.push(item.insert(&txn).await?);
        }

        let booking = recalc_in_txn(&txn, &booking).await?;

        txn.commit().await?;
        info!(booking_id = %booking.id, order_id = %order.id, "created booking");
        Ok(BookingWithItems { booking, items })
    }

    /// Gets a booking with its items.
    ///
    /// # Errors
    ///
    /// Returns an error if the booking does not exist in this company.
    pub async fn get_booking(
        &self,
        company_id: Uuid,
        booking_id: Uuid,
    ) -> Result<BookingWithItems, BookingError> {
        let booking = bookings::Entity::find_by_id(booking_id)
            .filter(bookings::Column::CompanyId.eq(company_id))
            .one(&self.db)
            .await?
            .ok_or(BookingError::NotFound(booking_id))?;

        let items = booking_items::Entity::find()
            .filter(booking_items::Column::BookingId.eq(booking_id))
            .order_by_asc(booking_items::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(BookingWithItems { booking, items })
    }

    /// Lists the company's bookings, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_bookings(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<bookings::Model>, BookingError> {
        let bookings = bookings::Entity::find()
            .filter(bookings::Column::CompanyId.eq(company_id))
            .order_by_desc(bookings::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(bookings)
    }

    /// Moves a booking item to a new status and recomputes the parent
    /// booking's status under its row lock.
    ///
    /// # Errors
    ///
    /// Returns an error if the booking item does not exist in this
    /// company.
    pub async fn set_item_status(
        &self,
        company_id: Uuid,
        booking_item_id: Uuid,
        status: CoreBookingStatus,
    ) -> Result<booking_items::Model, BookingError> {
        let txn = self.db.begin_tenant(company_id).await?;

        let item = booking_items::Entity::find_by_id(booking_item_id)
            .filter(booking_items::Column::CompanyId.eq(company_id))
            .one(&txn)
            .await?
            .ok_or(BookingError::ItemNotFound(booking_item_id))?;

        let booking = lock_booking(&txn, company_id, item.booking_id).await?;

        let mut active: booking_items::ActiveModel = item.into();
        active.status = Set(status.into());
        active.updated_at = Set(Utc::now().into());
        let item = active.update(&txn).await?;

        recalc_in_txn(&txn, &booking).await?;

        txn.commit().await?;
        debug!(%booking_item_id, "updated booking item status");
        Ok(item)
    }

    /// Updates the booking-level time window.
    ///
    /// # Errors
    ///
    /// Returns an error if the booking does not exist in this company.
    pub async fn set_window(
        &self,
        company_id: Uuid,
        booking_id: Uuid,
        start_at: Option<DateTime<Utc>>,
        end_at: Option<DateTime<Utc>>,
    ) -> Result<bookings::Model, BookingError> {
        let booking = bookings::Entity::find_by_id(booking_id)
            .filter(bookings::Column::CompanyId.eq(company_id))
            .one(&self.db)
            .await?
            .ok_or(BookingError::NotFound(booking_id))?;

        let mut active: bookings::ActiveModel = booking.into();
        active.start_at = Set(start_at.map(Into::into));
        active.end_at = Set(end_at.map(Into::into));
        active.updated_at = Set(Utc::now().into());
        Ok(active.update(&self.db).await?)
    }

    /// Deletes a booking and its items.
    ///
    /// # Errors
    ///
    /// Returns an error if the booking does not exist in this company.
    pub async fn delete_booking(
        &self,
        company_id: Uuid,
        booking_id: Uuid,
    ) -> Result<(), BookingError> {
        let booking = bookings::Entity::find_by_id(booking_id)
            .filter(bookings::Column::CompanyId.eq(company_id))
            .one(&self.db)
            .await?
            .ok_or(BookingError::NotFound(booking_id))?;

        bookings::Entity::delete_by_id(booking.id)
            .exec(&self.db)
            .await?;
        info!(%booking_id, "deleted booking");
        Ok(())
    }

    /// Recomputes a booking's status from its items.
    ///
    /// A booking with no items keeps its stored status.
    ///
    /// # Errors
    ///
    /// Returns an error if the booking does not exist in this company.
    pub async fn recalc_booking(
        &self,
        company_id: Uuid,
        booking_id: Uuid,
    ) -> Result<bookings::Model, BookingError> {
        let txn = self.db.begin_tenant(company_id).await?;
        let booking = lock_booking(&txn, company_id, booking_id).await?;
        let booking = recalc_in_txn(&txn, &booking).await?;
        txn.commit().await?;
        Ok(booking)
    }
}

/// Builds pending full-quantity specs for every non-deleted order item.
async fn default_item_specs(
    txn: &DatabaseTransaction,
    order_id: Uuid,
) -> Result<Vec<BookingItemSpec>, BookingError> {
    let order_items = order_items::Entity::find()
        .filter(order_items::Column::OrderId.eq(order_id))
        .filter(order_items::Column::Status.ne(OrderItemStatus::Deleted))
        .order_by_asc(order_items::Column::CreatedAt)
        .all(txn)
        .await?;

    Ok(order_items
        .into_iter()
        .map(|item| BookingItemSpec {
            order_item_id: item.id,
            quantity: item.quantity.unsigned_abs(),
            status: CoreBookingStatus::Pending,
            start_at: None,
            end_at: None,
        })
        .collect())
}

/// Fetches the booking row with `SELECT ... FOR UPDATE`.
async fn lock_booking(
    txn: &DatabaseTransaction,
    company_id: Uuid,
    booking_id: Uuid,
) -> Result<bookings::Model, BookingError> {
    let booking = bookings::Entity::find_by_id(booking_id)
        .filter(bookings::Column::CompanyId.eq(company_id))
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(BookingError::NotFound(booking_id))?;
    Ok(booking)
}

/// Derives the weakest-item status and persists it; leaves the status
/// untouched for a booking with zero items.
async fn recalc_in_txn(
    txn: &DatabaseTransaction,
    booking: &bookings::Model,
) -> Result<bookings::Model, BookingError> {
    let statuses: Vec<CoreBookingStatus> = booking_items::Entity::find()
        .filter(booking_items::Column::BookingId.eq(booking.id))
        .all(txn)
        .await?
        .into_iter()
        .map(|i| i.status.into())
        .collect();

    let Some(derived) = BookingService::derive_status(&statuses) else {
        return Ok(booking.clone());
    };

    let mut active: bookings::ActiveModel = booking.clone().into();
    active.status = Set(derived.into());
    active.updated_at = Set(Utc::now().into());
    let booking = active.update(txn).await?;

    debug!(booking_id = %booking.id, "recalculated booking status");
    Ok(booking)
}
