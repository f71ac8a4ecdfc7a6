use axum::{extract::State, routing::get, Json, Router};
use rpc::contracts::product::{ProductReply, ProductServiceClient};

use crate::errors::ApiError;
use crate::extract::IdPath;

pub fn router(products: ProductServiceClient) -> Router {
    Router::new()
        .route("/products/:id", get(get_product))
        .route("/products/by-owner/:owner_id", get(products_by_owner))
        .with_state(products)
}

async fn get_product(
    State(products): State<ProductServiceClient>,
    IdPath(id): IdPath,
) -> Result<Json<ProductReply>, ApiError> {
    let product = products.get_product_by_id(id).await?.ok_or(ApiError::NotFound("product"))?;
    Ok(Json(product))
}

/// Empty list when the owner has no active products.
async fn products_by_owner(
    State(products): State<ProductServiceClient>,
    IdPath(owner_id): IdPath,
) -> Result<Json<Vec<ProductReply>>, ApiError> {
    Ok(Json(products.get_products_by_owner(owner_id).await?))
}
