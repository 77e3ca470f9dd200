//! Catalog repository for product, client, and category records.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{categories, clients, products, sea_orm_active_enums::OperationType};

/// Catalog repository for supporting records.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    db: DatabaseConnection,
}

impl CatalogRepository {
    /// Creates a new catalog repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a product; `price` may be left open.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_product(
        &self,
        company_id: Uuid,
        name: &str,
        price: Option<Decimal>,
    ) -> Result<products::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let product = products::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(company_id),
            name: Set(name.to_string()),
            price: Set(price),
            created_at: Set(now),
            updated_at: Set(now),
        };
        product.insert(&self.db).await
    }

    /// Lists the company's products by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_products(&self, company_id: Uuid) -> Result<Vec<products::Model>, DbErr> {
        products::Entity::find()
            .filter(products::Column::CompanyId.eq(company_id))
            .order_by_asc(products::Column::Name)
            .all(&self.db)
            .await
    }

    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_client(
        &self,
        company_id: Uuid,
        name: &str,
        phone: Option<String>,
        email: Option<String>,
    ) -> Result<clients::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let client = clients::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(company_id),
            name: Set(name.to_string()),
            phone: Set(phone),
            email: Set(email),
            created_at: Set(now),
            updated_at: Set(now),
        };
        client.insert(&self.db).await
    }

    /// Lists the company's clients by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_clients(&self, company_id: Uuid) -> Result<Vec<clients::Model>, DbErr> {
        clients::Entity::find()
            .filter(clients::Column::CompanyId.eq(company_id))
            .order_by_asc(clients::Column::Name)
            .all(&self.db)
            .await
    }

    /// Creates a company-owned category.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_category(
        &self,
        company_id: Uuid,
        name: &str,
        operation_type: OperationType,
        activity_type: &str,
    ) -> Result<categories::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let category = categories::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(Some(company_id)),
            name: Set(name.to_string()),
            operation_type: Set(operation_type),
            activity_type: Set(activity_type.to_string()),
            description: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        category.insert(&self.db).await
    }

    /// Lists the categories visible to the company (its own plus
    /// global ones), by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_categories(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<categories::Model>, DbErr> {
        categories::Entity::find()
            .filter(
                Condition::any()
                    .add(categories::Column::CompanyId.eq(company_id))
                    .add(categories::Column::CompanyId.is_null()),
            )
            .order_by_asc(categories::Column::Name)
            .all(&self.db)
            .await
    }
}
