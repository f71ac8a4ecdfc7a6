use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use rpc::contracts::product::ProductReply;
use serde::Deserialize;
use service::product::domain::{product_reply, CreateProductInput};
use service::product::ProductService;

use crate::errors::ApiError;
use crate::extract::{require_non_empty, validate_email, IdPath, Validate, ValidatedJson};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductBody {
    #[serde(alias = "owner_email")]
    pub owner_email: String,
    pub name: String,
    pub price: i64,
}

impl Validate for CreateProductBody {
    fn validate(&self) -> Result<(), String> {
        validate_email(&self.owner_email)?;
        require_non_empty("name", &self.name)?;
        if self.price < 0 {
            return Err("price must not be negative".into());
        }
        Ok(())
    }
}

pub fn router(products: Arc<ProductService>) -> Router {
    Router::new()
        .route("/products", post(create_product))
        .route("/products/:id", delete(delete_product))
        .with_state(products)
}

async fn create_product(
    State(products): State<Arc<ProductService>>,
    ValidatedJson(body): ValidatedJson<CreateProductBody>,
) -> Result<(StatusCode, Json<ProductReply>), ApiError> {
    let input = CreateProductInput { owner_email: body.owner_email, name: body.name, price: body.price };
    let product = products.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(product_reply(&product))))
}

async fn delete_product(
    State(products): State<Arc<ProductService>>,
    IdPath(id): IdPath,
) -> Result<Json<ProductReply>, ApiError> {
    let deleted = products.delete_product_by_id(id).await?.ok_or(ApiError::NotFound("product"))?;
    Ok(Json(product_reply(&deleted)))
}
