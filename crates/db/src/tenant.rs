//! Tenant context for row-level security.
//!
//! Company-scoped tables carry RLS policies keyed on the
//! `app.current_company_id` setting. Repository transactions set it
//! before touching tenant data, so when the crate runs under a
//! non-owner application role the policies act as a second fence
//! behind the explicit `company_id` filters. The table owner bypasses
//! the policies; for it the setting is inert.

use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend, DbErr, Statement,
    TransactionTrait,
};
use uuid::Uuid;

/// The session setting the RLS policies read.
pub const TENANT_SETTING: &str = "app.current_company_id";

/// Sets the tenant context on a transaction.
///
/// The setting is transaction-local (`set_config` with `is_local`), so
/// it vanishes on commit or rollback and never leaks through the
/// connection pool.
///
/// # Errors
///
/// Returns an error if the setting cannot be applied.
pub async fn set_context(txn: &DatabaseTransaction, company_id: Uuid) -> Result<(), DbErr> {
    txn.execute(Statement::from_sql_and_values(
        DbBackend::Postgres,
        "SELECT set_config($1, $2, TRUE)",
        [TENANT_SETTING.into(), company_id.to_string().into()],
    ))
    .await?;
    Ok(())
}

/// Reads the tenant context back; `None` when unset.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn current_context<C: ConnectionTrait>(conn: &C) -> Result<Option<Uuid>, DbErr> {
    let row = conn
        .query_one(Statement::from_sql_and_values(
            DbBackend::Postgres,
            "SELECT current_setting($1, TRUE) AS tenant",
            [TENANT_SETTING.into()],
        ))
        .await?;
    let Some(row) = row else {
        return Ok(None);
    };
    let value: Option<String> = row.try_get("", "tenant")?;
    Ok(parse_context(value))
}

fn parse_context(value: Option<String>) -> Option<Uuid> {
    value
        .filter(|v| !v.is_empty())
        .and_then(|v| Uuid::parse_str(&v).ok())
}

/// Extension trait for starting company-scoped transactions.
#[async_trait::async_trait]
pub trait TenantExt {
    /// Begins a transaction with the tenant context already set.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started or the
    /// context cannot be set.
    async fn begin_tenant(&self, company_id: Uuid) -> Result<DatabaseTransaction, DbErr>;
}

#[async_trait::async_trait]
impl TenantExt for DatabaseConnection {
    async fn begin_tenant(&self, company_id: Uuid) -> Result<DatabaseTransaction, DbErr> {
        let txn = self.begin().await?;
        set_context(&txn, company_id).await?;
        Ok(txn)
    }
}

/// A transaction pinned to one company's tenant context.
///
/// Repositories start their own scoped transactions through
/// [`TenantExt::begin_tenant`]; this wrapper is for callers that hold
/// queries open across several statements under one context.
pub struct TenantConnection {
    txn: DatabaseTransaction,
    company_id: Uuid,
}

impl TenantConnection {
    /// Begins a tenant-scoped transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started or the
    /// context cannot be set.
    pub async fn begin(db: &DatabaseConnection, company_id: Uuid) -> Result<Self, DbErr> {
        let txn = db.begin_tenant(company_id).await?;
        Ok(Self { txn, company_id })
    }

    /// The company this connection is pinned to.
    #[must_use]
    pub const fn company_id(&self) -> Uuid {
        self.company_id
    }

    /// The underlying transaction for executing queries.
    #[must_use]
    pub fn transaction(&self) -> &DatabaseTransaction {
        &self.txn
    }

    /// Commits the transaction, persisting all changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails.
    pub async fn commit(self) -> Result<(), DbErr> {
        self.txn.commit().await
    }

    /// Rolls back the transaction, discarding all changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the rollback fails.
    pub async fn rollback(self) -> Result<(), DbErr> {
        self.txn.rollback().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Setting and reading the context against a real database is
    // covered by the crate's integration tests.

    #[test]
    fn test_parse_context_roundtrip() {
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(parse_context(Some(id.to_string())), Some(id));
    }

    #[test]
    fn test_parse_context_unset() {
        assert_eq!(parse_context(None), None);
        assert_eq!(parse_context(Some(String::new())), None);
        assert_eq!(parse_context(Some("not-a-uuid".to_string())), None);
    }
}
