//! Per-process wiring: which listeners a process opens and what is behind
//! each of them.

use std::fmt;
use std::sync::Arc;

use axum::Router;
use configs::AppConfig;
use rpc::contracts::product::{ProductServiceClient, PRODUCT_DOMAIN};
use rpc::contracts::user::{UserServiceClient, USER_DOMAIN};
use rpc::{RpcRegistry, ServiceLocator};
use service::credentials::Argon2Hasher;
use service::product::repo::SeaOrmProductRepository;
use service::product::ProductService;
use service::user::repo::SeaOrmUserRepository;
use service::user::UserService;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    ApiUser,
    AppUser,
    ApiProduct,
    AppProduct,
}

impl ServiceKind {
    /// Listener key in `[listeners.*]`.
    pub fn name(&self) -> &'static str {
        match self {
            ServiceKind::ApiUser => "api_user",
            ServiceKind::AppUser => "app_user",
            ServiceKind::ApiProduct => "api_product",
            ServiceKind::AppProduct => "app_product",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A router and the address it must be bound to.
pub struct Endpoint {
    pub name: String,
    pub addr: String,
    pub router: Router,
}

impl Endpoint {
    pub fn new(name: impl Into<String>, addr: impl Into<String>, router: Router) -> Self {
        Self { name: name.into(), addr: addr.into(), router }
    }
}

/// Name of a backend's RPC listener, e.g. `user_rpc`.
pub fn rpc_endpoint_name(domain: &str) -> String {
    format!("{domain}_rpc")
}

pub fn user_edge(config: &AppConfig, users: UserServiceClient) -> Result<Endpoint, StartupError> {
    let addr = config.listener(ServiceKind::ApiUser.name())?.bind_addr();
    Ok(Endpoint::new(ServiceKind::ApiUser.name(), addr, routes::public_router(routes::api_user::router(users))))
}

pub fn product_edge(config: &AppConfig, products: ProductServiceClient) -> Result<Endpoint, StartupError> {
    let addr = config.listener(ServiceKind::ApiProduct.name())?.bind_addr();
    Ok(Endpoint::new(
        ServiceKind::ApiProduct.name(),
        addr,
        routes::public_router(routes::api_product::router(products)),
    ))
}

/// Local HTTP edge plus the `UserService` RPC listener.
pub fn user_backend(config: &AppConfig, users: Arc<UserService>) -> Result<Vec<Endpoint>, StartupError> {
    let registry: Arc<RpcRegistry> = Arc::new(service::user::handlers::registry(users.clone())?);
    let http_addr = config.listener(ServiceKind::AppUser.name())?.bind_addr();
    let rpc_addr = config.service(USER_DOMAIN)?.bind_addr();
    Ok(vec![
        Endpoint::new(ServiceKind::AppUser.name(), http_addr, routes::public_router(routes::app_user::router(users))),
        Endpoint::new(rpc_endpoint_name(USER_DOMAIN), rpc_addr, routes::rpc_router(registry)),
    ])
}

/// Local HTTP edge plus the `ProductService` RPC listener.
pub fn product_backend(config: &AppConfig, products: Arc<ProductService>) -> Result<Vec<Endpoint>, StartupError> {
    let registry: Arc<RpcRegistry> = Arc::new(service::product::handlers::registry(products.clone())?);
    let http_addr = config.listener(ServiceKind::AppProduct.name())?.bind_addr();
    let rpc_addr = config.service(PRODUCT_DOMAIN)?.bind_addr();
    Ok(vec![
        Endpoint::new(
            ServiceKind::AppProduct.name(),
            http_addr,
            routes::public_router(routes::app_product::router(products)),
        ),
        Endpoint::new(rpc_endpoint_name(PRODUCT_DOMAIN), rpc_addr, routes::rpc_router(registry)),
    ])
}

/// Build every collaborator a process needs from its configuration.
pub async fn endpoints(kind: ServiceKind, config: &AppConfig) -> Result<Vec<Endpoint>, StartupError> {
    info!(service = %kind, "composing endpoints");
    match kind {
        ServiceKind::ApiUser => {
            let locator = ServiceLocator::from_config(config)?;
            Ok(vec![user_edge(config, UserServiceClient::from_locator(&locator)?)?])
        }
        ServiceKind::ApiProduct => {
            let locator = ServiceLocator::from_config(config)?;
            Ok(vec![product_edge(config, ProductServiceClient::from_locator(&locator)?)?])
        }
        ServiceKind::AppUser => {
            let hasher = Argon2Hasher::new(&config.credentials)?;
            let db = models::db::connect_with_config(&config.database).await?;
            let users = UserService::new(Arc::new(SeaOrmUserRepository::new(db)), Arc::new(hasher));
            user_backend(config, Arc::new(users))
        }
        ServiceKind::AppProduct => {
            let locator = ServiceLocator::from_config(config)?;
            let users = UserServiceClient::from_locator(&locator)?;
            let db = models::db::connect_with_config(&config.database).await?;
            let products = ProductService::new(Arc::new(SeaOrmProductRepository::new(db)), users);
            product_backend(config, Arc::new(products))
        }
    }
}
