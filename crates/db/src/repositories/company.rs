//! Company repository for tenant database operations.
//!
//! Creating a company also seeds its built-in "Sales" and "Refunds"
//! categories so ledger mirroring works from the first paid item.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use ledgerly_core::company::{normalize_subdomain, CompanyError};

use crate::entities::{
    categories, companies,
    sea_orm_active_enums::OperationType,
};
use crate::repositories::ledger::{REFUNDS_CATEGORY, SALES_CATEGORY};

/// Error types for company operations.
#[derive(Debug, thiserror::Error)]
pub enum CompanyRepoError {
    /// Subdomain validation failure.
    #[error(transparent)]
    Domain(#[from] CompanyError),

    /// Company name already in use.
    #[error("Company name already in use: {0}")]
    NameTaken(String),

    /// Subdomain already in use.
    #[error("Subdomain already in use: {0}")]
    SubdomainTaken(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a company.
#[derive(Debug, Clone)]
pub struct CreateCompanyInput {
    /// Display name; unique across all companies.
    pub name: String,
    /// Optional subdomain; normalized and validated before use.
    pub subdomain: Option<String>,
    /// Billing plan identifier.
    pub billing_plan: String,
    /// The owning user.
    pub owner_id: Uuid,
}

/// Company repository for tenant CRUD.
#[derive(Debug, Clone)]
pub struct CompanyRepository {
    db: DatabaseConnection,
}

impl CompanyRepository {
    /// Creates a new company repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a company by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<companies::Model>, DbErr> {
        companies::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds a company by its subdomain.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_subdomain(
        &self,
        subdomain: &str,
    ) -> Result<Option<companies::Model>, DbErr> {
        companies::Entity::find()
            .filter(companies::Column::Subdomain.eq(subdomain))
            .one(&self.db)
            .await
    }

    /// Checks if a subdomain is already taken.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn subdomain_exists(&self, subdomain: &str) -> Result<bool, DbErr> {
        let count = companies::Entity::find()
            .filter(companies::Column::Subdomain.eq(subdomain))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    /// Creates a company and seeds its built-in categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the subdomain is invalid or taken, the name
    /// is taken, or a database operation fails.
    pub async fn create_company(
        &self,
        input: CreateCompanyInput,
    ) -> Result<companies::Model, CompanyRepoError> {
        let subdomain = input
            .subdomain
            .as_deref()
            .map(normalize_subdomain)
            .transpose()?;

        let name_count = companies::Entity::find()
            .filter(companies::Column::Name.eq(&input.name))
            .count(&self.db)
            .await?;
        if name_count > 0 {
            return Err(CompanyRepoError::NameTaken(input.name));
        }
        if let Some(subdomain) = &subdomain {
            if self.subdomain_exists(subdomain).await? {
                return Err(CompanyRepoError::SubdomainTaken(subdomain.clone()));
            }
        }

        let txn = self.db.begin().await?;
        let now = chrono::Utc::now().into();
        let company_id = Uuid::new_v4();

        let company = companies::ActiveModel {
            id: Set(company_id),
            name: Set(input.name),
            subdomain: Set(subdomain),
            billing_plan: Set(input.billing_plan),
            owner_id: Set(input.owner_id),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let company = company.insert(&txn).await?;

        for (name, operation_type) in [
            (SALES_CATEGORY, OperationType::Income),
            (REFUNDS_CATEGORY, OperationType::Expense),
        ] {
            let category = categories::ActiveModel {
                id: Set(Uuid::new_v4()),
                company_id: Set(Some(company_id)),
                name: Set(name.to_string()),
                operation_type: Set(operation_type),
                activity_type: Set("operating".to_string()),
                description: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
            };
            category.insert(&txn).await?;
        }

        txn.commit().await?;
        info!(company_id = %company.id, "created company");
        Ok(company)
    }
}
