use std::sync::Arc;

use models::product::{NewProduct, ProductFilter, ProductStatus};
use rpc::contracts::user::UserServiceClient;
use tracing::{info, instrument, warn};

use super::domain::{CreateProductInput, Product};
use super::repository::ProductRepository;
use crate::errors::ServiceError;

/// Product domain service. Owners live in the user backend and are only
/// reached through its remote procedures.
pub struct ProductService {
    repo: Arc<dyn ProductRepository>,
    users: UserServiceClient,
}

impl ProductService {
    pub fn new(repo: Arc<dyn ProductRepository>, users: UserServiceClient) -> Self {
        Self { repo, users }
    }

    /// The owner must be an `ACTIVE` user; suspended and unknown owners are
    /// both [`ServiceError::UnknownOwner`].
    #[instrument(skip(self, input), fields(owner_email = %input.owner_email))]
    pub async fn create_product(&self, input: CreateProductInput) -> Result<Product, ServiceError> {
        let draft = NewProduct { owner_id: 0, name: input.name, price: input.price, status: None };
        draft.validate()?;

        let owner = self
            .users
            .get_active_user_by_email(&input.owner_email)
            .await?
            .ok_or_else(|| ServiceError::UnknownOwner(input.owner_email.clone()))?;

        let product = self.repo.save(NewProduct { owner_id: owner.id, ..draft }).await?;
        info!(product_id = product.id, owner_id = owner.id, "product_created");
        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn get_product_by_id(&self, id: i32) -> Result<Option<Product>, ServiceError> {
        self.repo.find_one(ProductFilter::by_id(id)).await
    }

    /// Only `ACTIVE` products, in id order.
    #[instrument(skip(self))]
    pub async fn get_products_by_owner(&self, owner_id: i32) -> Result<Vec<Product>, ServiceError> {
        self.repo
            .find_all(ProductFilter::by_owner(owner_id).with_status(ProductStatus::Active))
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_product_by_id(&self, id: i32) -> Result<Option<Product>, ServiceError> {
        let Some(snapshot) = self.repo.find_one(ProductFilter::by_id(id)).await? else {
            return Ok(None);
        };
        if !self.repo.delete_by_id(id).await? {
            warn!(product_id = id, "product vanished before delete");
            return Ok(None);
        }
        info!(product_id = id, "product_deleted");
        Ok(Some(snapshot))
    }
}
