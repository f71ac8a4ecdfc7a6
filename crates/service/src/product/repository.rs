use async_trait::async_trait;
use models::product::{NewProduct, ProductFilter};

use super::domain::Product;
use crate::errors::ServiceError;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_one(&self, filter: ProductFilter) -> Result<Option<Product>, ServiceError>;
    /// Matching rows in id order.
    async fn find_all(&self, filter: ProductFilter) -> Result<Vec<Product>, ServiceError>;
    async fn save(&self, new_product: NewProduct) -> Result<Product, ServiceError>;
    async fn delete_by_id(&self, id: i32) -> Result<bool, ServiceError>;
}

/// In-memory repository for tests and doc examples
pub mod mock {
    use std::collections::BTreeMap;

    use chrono::Utc;
    use models::errors::ModelError;
    use tokio::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Rows {
        next_id: i32,
        by_id: BTreeMap<i32, Product>,
    }

    #[derive(Default)]
    pub struct InMemoryProductRepository {
        rows: Mutex<Rows>,
    }

    fn ensure_bounded(filter: &ProductFilter) -> Result<(), ServiceError> {
        if filter.is_empty() {
            return Err(ModelError::Validation("product lookup needs at least one predicate".into()).into());
        }
        Ok(())
    }

    #[async_trait]
    impl ProductRepository for InMemoryProductRepository {
        async fn find_one(&self, filter: ProductFilter) -> Result<Option<Product>, ServiceError> {
            ensure_bounded(&filter)?;
            let rows = self.rows.lock().await;
            Ok(rows.by_id.values().find(|p| filter.matches(p)).cloned())
        }

        async fn find_all(&self, filter: ProductFilter) -> Result<Vec<Product>, ServiceError> {
            ensure_bounded(&filter)?;
            let rows = self.rows.lock().await;
            Ok(rows.by_id.values().filter(|p| filter.matches(p)).cloned().collect())
        }

        async fn save(&self, new_product: NewProduct) -> Result<Product, ServiceError> {
            new_product.validate()?;
            let mut rows = self.rows.lock().await;
            rows.next_id += 1;
            let now = Utc::now().into();
            let product = Product {
                id: rows.next_id,
                status: new_product.resolved_status(),
                owner_id: new_product.owner_id,
                name: new_product.name,
                price: new_product.price,
                created_at: now,
                updated_at: now,
            };
            rows.by_id.insert(product.id, product.clone());
            Ok(product)
        }

        async fn delete_by_id(&self, id: i32) -> Result<bool, ServiceError> {
            Ok(self.rows.lock().await.by_id.remove(&id).is_some())
        }
    }
}
