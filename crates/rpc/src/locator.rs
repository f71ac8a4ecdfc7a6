use std::collections::BTreeMap;
use std::sync::Arc;

use configs::AppConfig;
use tracing::info;

use crate::client::RpcClient;
use crate::error::RpcError;
use crate::transport::{HttpTransport, RpcTransport};

/// Logical domain name to RPC client, fixed at startup.
#[derive(Clone, Default)]
pub struct ServiceLocator {
    clients: BTreeMap<String, RpcClient>,
}

impl ServiceLocator {
    /// One HTTP client per `[services.<domain>]` entry.
    pub fn from_config(config: &AppConfig) -> Result<Self, RpcError> {
        let mut locator = Self::default();
        for (domain, target) in &config.services {
            let transport = HttpTransport::new(target)?;
            info!(%domain, base_url = %transport.base_url(), "rpc target resolved");
            locator = locator.with_transport(domain.clone(), Arc::new(transport));
        }
        Ok(locator)
    }

    pub fn with_transport(mut self, domain: impl Into<String>, transport: Arc<dyn RpcTransport>) -> Self {
        let domain = domain.into();
        self.clients.insert(domain.clone(), RpcClient::new(domain, transport));
        self
    }

    pub fn client(&self, domain: &str) -> Result<RpcClient, RpcError> {
        self.clients
            .get(domain)
            .cloned()
            .ok_or_else(|| RpcError::UnknownDomain(domain.to_string()))
    }

    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.clients.keys().map(String::as_str)
    }
}
