//! Order repository for order, item, and refund database operations.
//!
//! Every mutating entry point runs inside one database transaction:
//! lock the parent order row, apply the change, mirror the ledger
//! effect, then recompute the order's total and status from its items.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{debug, info};
use uuid::Uuid;

use ledgerly_core::cashflow::EntryReason;
use ledgerly_core::orders::{
    ItemChange, ItemSnapshot, LedgerEffect, OrderError, OrderItemInput, OrderService, RefundInput,
};

use crate::entities::{
    clients, order_item_refunds, order_items, orders, products,
    sea_orm_active_enums::{OrderItemStatus, OrderStatus},
};
use crate::repositories::ledger::{
    self, LedgerError, REFUNDS_CATEGORY, SALES_CATEGORY,
};
use crate::tenant::TenantExt;

/// Error types for order operations.
#[derive(Debug, thiserror::Error)]
pub enum OrderRepoError {
    /// Domain rule violation.
    #[error(transparent)]
    Domain(#[from] OrderError),

    /// Ledger mirroring failure.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// An order together with its line items.
#[derive(Debug, Clone)]
pub struct OrderWithItems {
    /// Order header.
    pub order: orders::Model,
    /// Line items, oldest first.
    pub items: Vec<order_items::Model>,
}

/// Order repository for CRUD and refund operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    db: DatabaseConnection,
}

impl OrderRepository {
    /// Creates a new order repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an empty order in pending status.
    ///
    /// # Errors
    ///
    /// Returns an error if the client does not exist in this company or
    /// the insert fails.
    pub async fn create_order(
        &self,
        company_id: Uuid,
        client_id: Option<Uuid>,
    ) -> Result<orders::Model, OrderRepoError> {
        if let Some(client_id) = client_id {
            check_client(&self.db, company_id, client_id).await?;
        }

        let now = Utc::now().into();
        let order = orders::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(company_id),
            client_id: Set(client_id),
            status: Set(OrderStatus::Pending),
            total_amount: Set(Decimal::ZERO),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let order = order.insert(&self.db).await?;
        info!(order_id = %order.id, "created order");
        Ok(order)
    }

    /// Gets an order with its items.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist in this company.
    pub async fn get_order(
        &self,
        company_id: Uuid,
        order_id: Uuid,
    ) -> Result<OrderWithItems, OrderRepoError> {
        let order = orders::Entity::find_by_id(order_id)
            .filter(orders::Column::CompanyId.eq(company_id))
            .one(&self.db)
            .await?
            .ok_or(OrderError::OrderNotFound(order_id))?;

        let items = order_items::Entity::find()
            .filter(order_items::Column::OrderId.eq(order_id))
            .order_by_asc(order_items::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(OrderWithItems { order, items })
    }

    /// Lists the company's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_orders(&self, company_id: Uuid) -> Result<Vec<orders::Model>, OrderRepoError> {
        let orders = orders::Entity::find()
            .filter(orders::Column::CompanyId.eq(company_id))
            .order_by_desc(orders::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(orders)
    }

    /// Reassigns (or clears) the order's client.
    ///
    /// # Errors
    ///
    /// Returns an error if the order or client does not exist in this
    /// company.
    pub async fn set_client(
        &self,
        company_id: Uuid,
        order_id: Uuid,
        client_id: Option<Uuid>,
    ) -> Result<orders::Model, OrderRepoError> {
        if let Some(client_id) = client_id {
            check_client(&self.db, company_id, client_id).await?;
        }

        let order = orders::Entity::find_by_id(order_id)
            .filter(orders::Column::CompanyId.eq(company_id))
            .one(&self.db)
            .await?
            .ok_or(OrderError::OrderNotFound(order_id))?;

        let mut active: orders::ActiveModel = order.into();
        active.client_id = Set(client_id);
        active.updated_at = Set(Utc::now().into());
        Ok(active.update(&self.db).await?)
    }

    /// Deletes an order, its items, refunds, and mirrored sales entries.
    ///
    /// Refund entries are kept: that money actually left a wallet and
    /// stays on the books. They are detached from their refund rows
    /// first, so they live on as ordinary manual entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist in this company.
    pub async fn delete_order(
        &self,
        company_id: Uuid,
        order_id: Uuid,
    ) -> Result<(), OrderRepoError> {
        let txn = self.db.begin_tenant(company_id).await?;

        let order = lock_order(&txn, company_id, order_id).await?;

        let items = order_items::Entity::find()
            .filter(order_items::Column::OrderId.eq(order.id))
            .all(&txn)
            .await?;
        for item in &items {
            ledger::remove_reason_entry(&txn, EntryReason::OrderItem(item.id)).await?;

            let refunds = order_item_refunds::Entity::find()
                .filter(order_item_refunds::Column::OrderItemId.eq(item.id))
                .all(&txn)
                .await?;
            for refund in &refunds {
                ledger::detach_reason_entry(&txn, EntryReason::Refund(refund.id)).await?;
            }
        }

        orders::Entity::delete_by_id(order.id).exec(&txn).await?;

        txn.commit().await?;
        info!(%order_id, "deleted order");
        Ok(())
    }

    /// Adds a line item to an order.
    ///
    /// The price defaults from the product when not supplied. A paid
    /// item is immediately mirrored into the ledger, and the order's
    /// total and status are recomputed before commit.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, a referenced entity is
    /// missing or foreign, or the database operation fails.
    pub async fn create_item(
        &self,
        company_id: Uuid,
        input: OrderItemInput,
    ) -> Result<order_items::Model, OrderRepoError> {
        let txn = self.db.begin_tenant(company_id).await?;

        let order = lock_order(&txn, company_id, input.order_id).await?;

        let product = products::Entity::find_by_id(input.product_id)
            .one(&txn)
            .await?
            .ok_or(OrderError::ProductNotFound(input.product_id))?;
        if product.company_id != company_id {
            return Err(OrderError::CompanyMismatch {
                entity: "Product",
                id: product.id,
            }
            .into());
        }

        let price = match input.price.or(product.price) {
            Some(price) => price,
            None => return Err(OrderError::NoPrice(product.id).into()),
        };

        let status: OrderItemStatus = input.status.into();
        if let Some(wallet_id) = input.wallet_id {
            ledger::check_wallet(&txn, company_id, wallet_id).await?;
        }
        OrderService::validate_item(
            input.quantity,
            price,
            input.discount,
            input.wallet_id,
            input.status,
        )?;

        let now = Utc::now().into();
        let item = order_items::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(company_id),
            order_id: Set(order.id),
            product_id: Set(product.id),
            quantity: Set(to_db_quantity(input.quantity)?),
            price: Set(price),
            discount: Set(input.discount),
            wallet_id: Set(input.wallet_id),
            status: Set(status),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let item = item.insert(&txn).await?;

        apply_item_ledger_effect(&txn, &item, &product.name).await?;
        recalc_in_txn(&txn, &order).await?;

        txn.commit().await?;
        debug!(item_id = %item.id, order_id = %order.id, "created order item");
        Ok(item)
    }

    /// Applies a partial update to a line item.
    ///
    /// Status transitions drive the ledger: moving to paid upserts the
    /// item's sales entry, moving to deleted removes it. The order's
    /// total and status are recomputed before commit.
    ///
    /// # Errors
    ///
    /// Returns an error if the item does not exist in this company, the
    /// resulting item fails validation, or the database operation fails.
    pub async fn update_item(
        &self,
        company_id: Uuid,
        item_id: Uuid,
        change: ItemChange,
    ) -> Result<order_items::Model, OrderRepoError> {
        let txn = self.db.begin_tenant(company_id).await?;

        let item = find_item(&txn, company_id, item_id).await?;
        let order = lock_order(&txn, company_id, item.order_id).await?;

        let quantity = change.quantity.unwrap_or(item.quantity.unsigned_abs());
        let price = change.price.unwrap_or(item.price);
        let discount = change.discount.unwrap_or(item.discount);
        let wallet_id = change.wallet_id.unwrap_or(item.wallet_id);
        let status = change.status.unwrap_or(item.status.clone().into());

        if let Some(wallet_id) = wallet_id {
            ledger::check_wallet(&txn, company_id, wallet_id).await?;
        }
        OrderService::validate_item(quantity, price, discount, wallet_id, status)?;

        let mut active: order_items::ActiveModel = item.into();
        active.quantity = Set(to_db_quantity(quantity)?);
        active.price = Set(price);
        active.discount = Set(discount);
        active.wallet_id = Set(wallet_id);
        active.status = Set(status.into());
        active.updated_at = Set(Utc::now().into());
        let item = active.update(&txn).await?;

        let product = products::Entity::find_by_id(item.product_id)
            .one(&txn)
            .await?
            .ok_or(OrderError::ProductNotFound(item.product_id))?;

        apply_item_ledger_effect(&txn, &item, &product.name).await?;
        recalc_in_txn(&txn, &order).await?;

        txn.commit().await?;
        debug!(%item_id, "updated order item");
        Ok(item)
    }

    /// Soft-deletes a line item.
    ///
    /// The item moves to deleted status, its sales entry (if any) is
    /// removed, and the order's total and status are recomputed.
    ///
    /// # Errors
    ///
    /// Returns an error if the item does not exist in this company.
    pub async fn delete_item(
        &self,
        company_id: Uuid,
        item_id: Uuid,
    ) -> Result<order_items::Model, OrderRepoError> {
        let txn = self.db.begin_tenant(company_id).await?;

        let item = find_item(&txn, company_id, item_id).await?;
        let order = lock_order(&txn, company_id, item.order_id).await?;

        let mut active: order_items::ActiveModel = item.into();
        active.status = Set(OrderItemStatus::Deleted);
        active.updated_at = Set(Utc::now().into());
        let item = active.update(&txn).await?;

        ledger::remove_reason_entry(&txn, EntryReason::OrderItem(item.id)).await?;
        recalc_in_txn(&txn, &order).await?;

        txn.commit().await?;
        debug!(%item_id, "soft-deleted order item");
        Ok(item)
    }

    /// Refunds part or all of a paid line item.
    ///
    /// Validates the cumulative refunded quantity against the purchased
    /// quantity, records the refund, and mirrors a refund ledger entry,
    /// all under the parent order's row lock.
    ///
    /// # Errors
    ///
    /// Returns an error if the item is not paid, the refund would
    /// exceed the remaining quantity, a referenced entity is missing or
    /// foreign, or the database operation fails.
    pub async fn refund_item(
        &self,
        company_id: Uuid,
        input: RefundInput,
    ) -> Result<order_item_refunds::Model, OrderRepoError> {
        let txn = self.db.begin_tenant(company_id).await?;

        let item = find_item(&txn, company_id, input.order_item_id).await?;
        lock_order(&txn, company_id, item.order_id).await?;

        ledger::check_wallet(&txn, company_id, input.wallet_id).await?;

        let already_refunded: u32 = order_item_refunds::Entity::find()
            .filter(order_item_refunds::Column::OrderItemId.eq(item.id))
            .all(&txn)
            .await?
            .iter()
            .map(|r| r.refund_quantity.unsigned_abs())
            .sum();

        OrderService::validate_refund(
            item.status.clone().into(),
            item.quantity.unsigned_abs(),
            already_refunded,
            &input,
        )?;

        let today = Utc::now().date_naive();
        let refund = order_item_refunds::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(company_id),
            order_item_id: Set(item.id),
            refund_quantity: Set(to_db_quantity(input.refund_quantity)?),
            refund_amount: Set(input.refund_amount),
            wallet_id: Set(input.wallet_id),
            reason: Set(Some(input.reason.clone()).filter(|r| !r.is_empty())),
            refund_date: Set(today),
            created_at: Set(Utc::now().into()),
        };
        let refund = refund.insert(&txn).await?;

        let category = ledger::find_builtin_category(&txn, company_id, REFUNDS_CATEGORY).await?;
        let description = if input.reason.is_empty() {
            format!("Refund of {} unit(s)", input.refund_quantity)
        } else {
            format!("Refund: {}", input.reason)
        };
        ledger::upsert_reason_entry(
            &txn,
            company_id,
            EntryReason::Refund(refund.id),
            input.wallet_id,
            category.id,
            input.refund_amount,
            today,
            description,
        )
        .await?;

        txn.commit().await?;
        info!(refund_id = %refund.id, item_id = %input.order_item_id, "refunded order item");
        Ok(refund)
    }

    /// Recomputes an order's total and status from its items.
    ///
    /// Safe to re-run at any time; doubles as a repair tool for rows
    /// written before derivation rules changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist in this company.
    pub async fn recalc_order(
        &self,
        company_id: Uuid,
        order_id: Uuid,
    ) -> Result<orders::Model, OrderRepoError> {
        let txn = self.db.begin_tenant(company_id).await?;
        let order = lock_order(&txn, company_id, order_id).await?;
        let order = recalc_in_txn(&txn, &order).await?;
        txn.commit().await?;
        Ok(order)
    }
}

/// Converts a validated quantity into its storage representation.
fn to_db_quantity(quantity: u32) -> Result<i32, OrderRepoError> {
    i32::try_from(quantity).map_err(|_| OrderError::QuantityTooLarge(quantity).into())
}

/// Fetches the order row with `SELECT ... FOR UPDATE`, serializing
/// concurrent mutations of the same order.
async fn lock_order(
    txn: &DatabaseTransaction,
    company_id: Uuid,
    order_id: Uuid,
) -> Result<orders::Model, OrderRepoError> {
    let order = orders::Entity::find_by_id(order_id)
        .filter(orders::Column::CompanyId.eq(company_id))
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(OrderError::OrderNotFound(order_id))?;
    Ok(order)
}

async fn find_item(
    txn: &DatabaseTransaction,
    company_id: Uuid,
    item_id: Uuid,
) -> Result<order_items::Model, OrderRepoError> {
    let item = order_items::Entity::find_by_id(item_id)
        .filter(order_items::Column::CompanyId.eq(company_id))
        .one(txn)
        .await?
        .ok_or(OrderError::ItemNotFound(item_id))?;
    Ok(item)
}

async fn check_client(
    db: &DatabaseConnection,
    company_id: Uuid,
    client_id: Uuid,
) -> Result<clients::Model, OrderRepoError> {
    let client = clients::Entity::find_by_id(client_id)
        .one(db)
        .await?
        .ok_or(OrderError::ClientNotFound(client_id))?;
    if client.company_id != company_id {
        return Err(OrderError::CompanyMismatch {
            entity: "Client",
            id: client_id,
        }
        .into());
    }
    Ok(client)
}

/// Mirrors the item's current status into the ledger.
async fn apply_item_ledger_effect(
    txn: &DatabaseTransaction,
    item: &order_items::Model,
    product_name: &str,
) -> Result<(), OrderRepoError> {
    match OrderService::ledger_effect(item.status.clone().into()) {
        LedgerEffect::UpsertSales => {
            let wallet_id = item
                .wallet_id
                .ok_or(OrderError::PaidWithoutWallet)?;
            let category =
                ledger::find_builtin_category(txn, item.company_id, SALES_CATEGORY).await?;
            let amount = OrderService::item_amount(
                item.quantity.unsigned_abs(),
                item.price,
                item.discount,
            );
            ledger::upsert_reason_entry(
                txn,
                item.company_id,
                EntryReason::OrderItem(item.id),
                wallet_id,
                category.id,
                amount,
                Utc::now().date_naive(),
                format!("Sale: {} x{}", product_name, item.quantity),
            )
            .await?;
        }
        LedgerEffect::Remove => {
            ledger::remove_reason_entry(txn, EntryReason::OrderItem(item.id)).await?;
        }
    }
    Ok(())
}

/// Recomputes the order's derived columns from its items and persists
/// them.
async fn recalc_in_txn(
    txn: &DatabaseTransaction,
    order: &orders::Model,
) -> Result<orders::Model, OrderRepoError> {
    let items = order_items::Entity::find()
        .filter(order_items::Column::OrderId.eq(order.id))
        .all(txn)
        .await?;

    let snapshots: Vec<ItemSnapshot> = items
        .iter()
        .map(|i| ItemSnapshot {
            status: i.status.clone().into(),
            quantity: i.quantity.unsigned_abs(),
            price: i.price,
            discount: i.discount,
        })
        .collect();
    let statuses: Vec<_> = snapshots.iter().map(|s| s.status).collect();

    let total = OrderService::order_total(&snapshots);
    let status: OrderStatus = OrderService::derive_order_status(&statuses).into();

    let mut active: orders::ActiveModel = order.clone().into();
    active.total_amount = Set(total);
    active.status = Set(status);
    active.updated_at = Set(Utc::now().into());
    let order = active.update(txn).await?;

    debug!(order_id = %order.id, total = %order.total_amount, "recalculated order");
    Ok(order)
}
