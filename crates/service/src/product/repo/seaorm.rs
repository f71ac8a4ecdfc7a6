use async_trait::async_trait;
use models::product::{NewProduct, ProductFilter};
use sea_orm::DatabaseConnection;

use crate::errors::ServiceError;
use crate::product::domain::Product;
use crate::product::repository::ProductRepository;

/// SeaORM-backed repository implementation.
pub struct SeaOrmProductRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for SeaOrmProductRepository {
    async fn find_one(&self, filter: ProductFilter) -> Result<Option<Product>, ServiceError> {
        Ok(models::product::find_one(&self.db, &filter).await?)
    }

    async fn find_all(&self, filter: ProductFilter) -> Result<Vec<Product>, ServiceError> {
        Ok(models::product::find_all(&self.db, &filter).await?)
    }

    async fn save(&self, new_product: NewProduct) -> Result<Product, ServiceError> {
        Ok(models::product::insert(&self.db, new_product).await?)
    }

    async fn delete_by_id(&self, id: i32) -> Result<bool, ServiceError> {
        Ok(models::product::delete_by_id(&self.db, id).await?)
    }
}
