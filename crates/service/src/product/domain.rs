use models::product::ProductStatus;
use rpc::contracts::product::{ProductReply, ProductState};

pub type Product = models::product::Model;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProductInput {
    /// Resolved to a user id through the user backend.
    pub owner_email: String,
    pub name: String,
    pub price: i64,
}

pub fn product_state(status: ProductStatus) -> ProductState {
    match status {
        ProductStatus::Active => ProductState::Active,
        ProductStatus::Hidden => ProductState::Hidden,
    }
}

pub fn product_reply(product: &Product) -> ProductReply {
    ProductReply {
        id: product.id,
        owner_id: product.owner_id,
        name: product.name.clone(),
        price: product.price,
        status: product_state(product.status),
        created_at: product.created_at,
    }
}
