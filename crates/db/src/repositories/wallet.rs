//! Wallet repository for wallet database operations.
//!
//! Balances are never stored: every balance is the signed sum of the
//! wallet's ledger entries at query time.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use ledgerly_core::cashflow::{self, CashflowError, EntryFilter};

use crate::entities::{categories, wallets};
use crate::repositories::ledger::{filtered_entries, LedgerError};

/// A wallet with its computed balance.
#[derive(Debug, Clone)]
pub struct WalletBalance {
    /// The wallet.
    pub wallet: wallets::Model,
    /// Signed sum of the wallet's matching entries; negative when
    /// expenses exceed income.
    pub balance: Decimal,
}

/// Wallet repository for CRUD and balance operations.
#[derive(Debug, Clone)]
pub struct WalletRepository {
    db: DatabaseConnection,
}

impl WalletRepository {
    /// Creates a new wallet repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a wallet.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (including a duplicate name
    /// within the company).
    pub async fn create_wallet(
        &self,
        company_id: Uuid,
        name: &str,
    ) -> Result<wallets::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let wallet = wallets::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(company_id),
            name: Set(name.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        wallet.insert(&self.db).await
    }

    /// Lists the company's wallets by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_wallets(&self, company_id: Uuid) -> Result<Vec<wallets::Model>, DbErr> {
        wallets::Entity::find()
            .filter(wallets::Column::CompanyId.eq(company_id))
            .order_by_asc(wallets::Column::Name)
            .all(&self.db)
            .await
    }

    /// Computes one wallet's balance over the entries matching the
    /// filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the wallet does not exist in this company or
    /// the query fails.
    pub async fn wallet_balance(
        &self,
        company_id: Uuid,
        wallet_id: Uuid,
        filter: &EntryFilter,
        today: NaiveDate,
    ) -> Result<WalletBalance, LedgerError> {
        let wallet = wallets::Entity::find_by_id(wallet_id)
            .filter(wallets::Column::CompanyId.eq(company_id))
            .one(&self.db)
            .await?
            .ok_or(CashflowError::WalletNotFound(wallet_id))?;

        let mut filter = filter.clone();
        filter.wallet_id = Some(wallet_id);
        let entries = self.classified_amounts(company_id, &filter, today).await?;

        Ok(WalletBalance {
            wallet,
            balance: cashflow::wallet_balance(
                entries.into_iter().map(|(_, op, amount)| (op, amount)),
            ),
        })
    }

    /// Computes every wallet's balance over the entries matching the
    /// filter; wallets without entries report zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn wallet_balances(
        &self,
        company_id: Uuid,
        filter: &EntryFilter,
        today: NaiveDate,
    ) -> Result<Vec<WalletBalance>, LedgerError> {
        let wallets = self.list_wallets(company_id).await?;
        let entries = self.classified_amounts(company_id, filter, today).await?;

        Ok(wallets
            .into_iter()
            .map(|wallet| {
                let balance = cashflow::wallet_balance(
                    entries
                        .iter()
                        .filter(|(wallet_id, _, _)| *wallet_id == wallet.id)
                        .map(|(_, op, amount)| (*op, *amount)),
                );
                WalletBalance { wallet, balance }
            })
            .collect())
    }

    /// Loads `(wallet_id, operation_type, amount)` triples for the
    /// matching entries.
    async fn classified_amounts(
        &self,
        company_id: Uuid,
        filter: &EntryFilter,
        today: NaiveDate,
    ) -> Result<Vec<(Uuid, ledgerly_core::cashflow::OperationType, Decimal)>, LedgerError> {
        let rows = filtered_entries(company_id, filter, today)
            .find_also_related(categories::Entity)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(entry, category)| {
                category.map(|c| (entry.wallet_id, c.operation_type.into(), entry.amount))
            })
            .collect())
    }
}
