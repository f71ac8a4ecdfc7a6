//! `ProductService` contract, served by the product backend.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::client::RpcClient;
use crate::descriptor::{MethodDescriptor, RemoteMethod};
use crate::error::RpcError;
use crate::locator::ServiceLocator;

pub const PRODUCT_DOMAIN: &str = "product";
pub const PRODUCT_SERVICE: &str = "ProductService";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductState {
    Active,
    Hidden,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductReply {
    pub id: i32,
    #[serde(alias = "owner_id")]
    pub owner_id: i32,
    pub name: String,
    pub price: i64,
    pub status: ProductState,
    #[serde(alias = "created_at")]
    pub created_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductIdRequest {
    #[serde(alias = "productId", alias = "product_id")]
    pub id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerRequest {
    #[serde(alias = "owner_id", alias = "userId", alias = "user_id")]
    pub owner_id: i32,
}

pub struct GetProductById;
pub struct GetProductsByOwner;

impl RemoteMethod for GetProductById {
    const SERVICE: &'static str = PRODUCT_SERVICE;
    const METHOD: &'static str = "GetProductById";
    type Request = ProductIdRequest;
    type Response = Option<ProductReply>;
}

impl RemoteMethod for GetProductsByOwner {
    const SERVICE: &'static str = PRODUCT_SERVICE;
    const METHOD: &'static str = "GetProductsByOwner";
    type Request = OwnerRequest;
    type Response = Vec<ProductReply>;
}

pub const PRODUCT_METHODS: [MethodDescriptor; 2] = [
    MethodDescriptor::new(GetProductById::SERVICE, GetProductById::METHOD),
    MethodDescriptor::new(GetProductsByOwner::SERVICE, GetProductsByOwner::METHOD),
];

#[derive(Clone)]
pub struct ProductServiceClient {
    inner: RpcClient,
}

impl ProductServiceClient {
    pub fn new(inner: RpcClient) -> Self {
        Self { inner }
    }

    pub fn from_locator(locator: &ServiceLocator) -> Result<Self, RpcError> {
        Ok(Self::new(locator.client(PRODUCT_DOMAIN)?))
    }

    pub async fn get_product_by_id(&self, id: i32) -> Result<Option<ProductReply>, RpcError> {
        self.inner.call::<GetProductById>(ProductIdRequest { id }).await
    }

    /// Active products of one owner, in id order.
    pub async fn get_products_by_owner(&self, owner_id: i32) -> Result<Vec<ProductReply>, RpcError> {
        self.inner.call::<GetProductsByOwner>(OwnerRequest { owner_id }).await
    }
}
