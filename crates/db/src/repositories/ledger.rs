//! Ledger repository for cashflow entry database operations.
//!
//! Besides manual entry CRUD, this module owns the reason-keyed
//! mirroring helpers the order repository uses to keep paid items and
//! refunds reflected in the ledger.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait, Select, Set,
};
use tracing::debug;
use uuid::Uuid;

use ledgerly_core::cashflow::{CashflowError, EntryFilter, EntryReason};

use crate::entities::{
    categories, ledger_entries,
    sea_orm_active_enums::{EntryReasonType, OperationType},
    wallets,
};

/// Name of the built-in category that mirrored sales entries use.
pub const SALES_CATEGORY: &str = "Sales";

/// Name of the built-in category that mirrored refund entries use.
pub const REFUNDS_CATEGORY: &str = "Refunds";

/// Error types for ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Domain rule violation.
    #[error(transparent)]
    Domain(#[from] CashflowError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a manual ledger entry.
#[derive(Debug, Clone)]
pub struct CreateEntryInput {
    /// Wallet the money moves through.
    pub wallet_id: Uuid,
    /// Category classifying the movement.
    pub category_id: Uuid,
    /// Non-negative magnitude; sign is implied by the category.
    pub amount: Decimal,
    /// Date the movement happened.
    pub entry_date: NaiveDate,
    /// Free-form description.
    pub description: Option<String>,
}

/// Splits an [`EntryReason`] into its database columns.
#[must_use]
pub fn reason_parts(reason: EntryReason) -> (EntryReasonType, Uuid) {
    match reason {
        EntryReason::OrderItem(id) => (EntryReasonType::OrderItem, id),
        EntryReason::Refund(id) => (EntryReasonType::Refund, id),
    }
}

/// Ledger repository for entry operations.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a manual ledger entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is negative, the wallet or
    /// category does not exist or belongs to another company, or the
    /// insert fails.
    pub async fn create_entry(
        &self,
        company_id: Uuid,
        input: CreateEntryInput,
    ) -> Result<ledger_entries::Model, LedgerError> {
        if input.amount < Decimal::ZERO {
            return Err(CashflowError::NegativeAmount.into());
        }
        check_wallet(&self.db, company_id, input.wallet_id).await?;
        check_category(&self.db, company_id, input.category_id).await?;

        let now = Utc::now().into();
        let entry = ledger_entries::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(company_id),
            wallet_id: Set(input.wallet_id),
            category_id: Set(input.category_id),
            amount: Set(input.amount),
            entry_date: Set(input.entry_date),
            description: Set(input.description),
            reason_type: Set(None),
            reason_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let entry = entry.insert(&self.db).await?;
        debug!(entry_id = %entry.id, "created manual ledger entry");
        Ok(entry)
    }

    /// Deletes a manual ledger entry.
    ///
    /// Mirrored entries are managed by their source records and cannot
    /// be deleted directly.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry does not exist in this company or
    /// is a mirrored entry.
    pub async fn delete_entry(&self, company_id: Uuid, entry_id: Uuid) -> Result<(), LedgerError> {
        let entry = ledger_entries::Entity::find_by_id(entry_id)
            .filter(ledger_entries::Column::CompanyId.eq(company_id))
            .one(&self.db)
            .await?
            .ok_or(CashflowError::EntryNotFound(entry_id))?;

        if entry.reason_type.is_some() {
            return Err(CashflowError::MirroredEntryImmutable(entry_id).into());
        }

        ledger_entries::Entity::delete_by_id(entry_id)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Lists entries matching the filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_entries(
        &self,
        company_id: Uuid,
        filter: &EntryFilter,
        today: NaiveDate,
    ) -> Result<Vec<ledger_entries::Model>, LedgerError> {
        let entries = filtered_entries(company_id, filter, today)
            .order_by_desc(ledger_entries::Column::EntryDate)
            .order_by_desc(ledger_entries::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(entries)
    }
}

/// Builds the entry query for a filter; every condition is AND-combined.
///
/// Category-dependent conditions (flow direction, activity type) go
/// through a subquery so callers remain free to join categories however
/// they need.
pub(crate) fn filtered_entries(
    company_id: Uuid,
    filter: &EntryFilter,
    today: NaiveDate,
) -> Select<ledger_entries::Entity> {
    let mut query =
        ledger_entries::Entity::find().filter(ledger_entries::Column::CompanyId.eq(company_id));

    let (start, end) = filter.date_bounds(today);
    if let Some(start) = start {
        query = query.filter(ledger_entries::Column::EntryDate.gte(start));
    }
    if let Some(end) = end {
        query = query.filter(ledger_entries::Column::EntryDate.lte(end));
    }

    if let Some(wallet_id) = filter.wallet_id {
        query = query.filter(ledger_entries::Column::WalletId.eq(wallet_id));
    }
    if let Some(category_id) = filter.category_id {
        query = query.filter(ledger_entries::Column::CategoryId.eq(category_id));
    }
    if let Some(min) = filter.amount_min {
        query = query.filter(ledger_entries::Column::Amount.gte(min));
    }
    if let Some(max) = filter.amount_max {
        query = query.filter(ledger_entries::Column::Amount.lte(max));
    }
    if let Some(substring) = &filter.description_substring {
        query = query.filter(
            Expr::col((ledger_entries::Entity, ledger_entries::Column::Description))
                .ilike(format!("%{substring}%")),
        );
    }

    if filter.flow.is_some() || filter.activity_type.is_some() {
        let mut categories_query = categories::Entity::find()
            .select_only()
            .column(categories::Column::Id);
        if let Some(flow) = filter.flow {
            let ops: Vec<OperationType> = flow
                .operation_types()
                .into_iter()
                .map(Into::into)
                .collect();
            categories_query =
                categories_query.filter(categories::Column::OperationType.is_in(ops));
        }
        if let Some(activity) = &filter.activity_type {
            categories_query =
                categories_query.filter(categories::Column::ActivityType.eq(activity.as_str()));
        }
        query = query.filter(
            ledger_entries::Column::CategoryId.in_subquery(categories_query.into_query()),
        );
    }

    query
}

/// Finds a built-in category for the company (company-owned first, then
/// global).
///
/// # Errors
///
/// Returns `MissingBuiltinCategory` when neither exists.
pub(crate) async fn find_builtin_category<C: ConnectionTrait>(
    conn: &C,
    company_id: Uuid,
    name: &'static str,
) -> Result<categories::Model, LedgerError> {
    let company_owned = categories::Entity::find()
        .filter(categories::Column::CompanyId.eq(company_id))
        .filter(categories::Column::Name.eq(name))
        .one(conn)
        .await?;
    if let Some(category) = company_owned {
        return Ok(category);
    }

    let global = categories::Entity::find()
        .filter(categories::Column::CompanyId.is_null())
        .filter(categories::Column::Name.eq(name))
        .one(conn)
        .await?;
    global.ok_or_else(|| CashflowError::MissingBuiltinCategory(name).into())
}

/// Upserts the single mirrored entry for a reason.
///
/// Exactly one entry may exist per `(reason_type, reason_id)`; a second
/// mirror of the same source updates the existing row in place.
pub(crate) async fn upsert_reason_entry<C: ConnectionTrait>(
    conn: &C,
    company_id: Uuid,
    reason: EntryReason,
    wallet_id: Uuid,
    category_id: Uuid,
    amount: Decimal,
    entry_date: NaiveDate,
    description: String,
) -> Result<ledger_entries::Model, LedgerError> {
    let (reason_type, reason_id) = reason_parts(reason);
    let now = Utc::now().into();

    let existing = ledger_entries::Entity::find()
        .filter(ledger_entries::Column::ReasonType.eq(reason_type.clone()))
        .filter(ledger_entries::Column::ReasonId.eq(reason_id))
        .one(conn)
        .await?;

    let entry = if let Some(existing) = existing {
        let mut active: ledger_entries::ActiveModel = existing.into();
        active.wallet_id = Set(wallet_id);
        active.category_id = Set(category_id);
        active.amount = Set(amount);
        active.entry_date = Set(entry_date);
        active.description = Set(Some(description));
        active.updated_at = Set(now);
        active.update(conn).await?
    } else {
        let entry = ledger_entries::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(company_id),
            wallet_id: Set(wallet_id),
            category_id: Set(category_id),
            amount: Set(amount),
            entry_date: Set(entry_date),
            description: Set(Some(description)),
            reason_type: Set(Some(reason_type)),
            reason_id: Set(Some(reason_id)),
            created_at: Set(now),
            updated_at: Set(now),
        };
        entry.insert(conn).await?
    };

    debug!(entry_id = %entry.id, "mirrored ledger entry");
    Ok(entry)
}

/// Removes the mirrored entry for a reason; a no-op when none exists.
pub(crate) async fn remove_reason_entry<C: ConnectionTrait>(
    conn: &C,
    reason: EntryReason,
) -> Result<(), LedgerError> {
    let (reason_type, reason_id) = reason_parts(reason);
    ledger_entries::Entity::delete_many()
        .filter(ledger_entries::Column::ReasonType.eq(reason_type))
        .filter(ledger_entries::Column::ReasonId.eq(reason_id))
        .exec(conn)
        .await?;
    Ok(())
}

/// Detaches the mirrored entry for a reason, leaving it behind as a
/// manual entry; a no-op when none exists.
///
/// Used when the source row is about to go away but the money it
/// records should stay on the books.
pub(crate) async fn detach_reason_entry<C: ConnectionTrait>(
    conn: &C,
    reason: EntryReason,
) -> Result<(), LedgerError> {
    let (reason_type, reason_id) = reason_parts(reason);
    let existing = ledger_entries::Entity::find()
        .filter(ledger_entries::Column::ReasonType.eq(reason_type))
        .filter(ledger_entries::Column::ReasonId.eq(reason_id))
        .one(conn)
        .await?;
    if let Some(entry) = existing {
        let mut active: ledger_entries::ActiveModel = entry.into();
        active.reason_type = Set(None);
        active.reason_id = Set(None);
        active.updated_at = Set(Utc::now().into());
        active.update(conn).await?;
    }
    Ok(())
}

/// Verifies a wallet exists and belongs to the company.
pub(crate) async fn check_wallet<C: ConnectionTrait>(
    conn: &C,
    company_id: Uuid,
    wallet_id: Uuid,
) -> Result<wallets::Model, LedgerError> {
    let wallet = wallets::Entity::find_by_id(wallet_id)
        .one(conn)
        .await?
        .ok_or(CashflowError::WalletNotFound(wallet_id))?;
    if wallet.company_id != company_id {
        return Err(CashflowError::CompanyMismatch {
            entity: "Wallet",
            id: wallet_id,
        }
        .into());
    }
    Ok(wallet)
}

/// Verifies a category exists and is visible to the company (its own or
/// global).
pub(crate) async fn check_category<C: ConnectionTrait>(
    conn: &C,
    company_id: Uuid,
    category_id: Uuid,
) -> Result<categories::Model, LedgerError> {
    let category = categories::Entity::find_by_id(category_id)
        .one(conn)
        .await?
        .ok_or(CashflowError::CategoryNotFound(category_id))?;
    if let Some(owner) = category.company_id {
        if owner != company_id {
            return Err(CashflowError::CompanyMismatch {
                entity: "Category",
                id: category_id,
            }
            .into());
        }
    }
    Ok(category)
}
