use std::sync::Arc;

use rpc::contracts::product::{GetProductById, GetProductsByOwner, PRODUCT_METHODS};
use rpc::{RegistryBuilder, RegistryError, RpcFault, RpcRegistry};

use super::domain::product_reply;
use super::service::ProductService;

pub fn register(builder: RegistryBuilder, service: Arc<ProductService>) -> RegistryBuilder {
    let by_id = service.clone();
    let by_owner = service;
    builder
        .declare(&PRODUCT_METHODS)
        .register::<GetProductById, _, _>(move |req| {
            let svc = by_id.clone();
            async move {
                svc.get_product_by_id(req.id)
                    .await
                    .map(|found| found.as_ref().map(product_reply))
                    .map_err(RpcFault::from)
            }
        })
        .register::<GetProductsByOwner, _, _>(move |req| {
            let svc = by_owner.clone();
            async move {
                svc.get_products_by_owner(req.owner_id)
                    .await
                    .map(|rows| rows.iter().map(product_reply).collect::<Vec<_>>())
                    .map_err(RpcFault::from)
            }
        })
}

pub fn registry(service: Arc<ProductService>) -> Result<RpcRegistry, RegistryError> {
    register(RegistryBuilder::new(), service).build()
}
