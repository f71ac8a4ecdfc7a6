use std::sync::Arc;

use tracing::debug;

use crate::descriptor::RemoteMethod;
use crate::error::RpcError;
use crate::transport::RpcTransport;
use crate::wire::RpcReply;

/// Client bound to one backend domain.
#[derive(Clone)]
pub struct RpcClient {
    domain: String,
    transport: Arc<dyn RpcTransport>,
}

impl RpcClient {
    pub fn new(domain: impl Into<String>, transport: Arc<dyn RpcTransport>) -> Self {
        Self { domain: domain.into(), transport }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Invoke `M` and decode its response. Faults come back as
    /// [`RpcError::Fault`].
    pub async fn call<M: RemoteMethod>(&self, request: M::Request) -> Result<M::Response, RpcError> {
        let method = M::descriptor();
        let payload = serde_json::to_value(&request)
            .map_err(|source| RpcError::Encode { method: method.to_string(), source })?;
        debug!(domain = %self.domain, rpc = %method, "rpc call");
        match self.transport.invoke(method, payload).await? {
            RpcReply::Ok { payload } => serde_json::from_value(payload).map_err(|e| RpcError::Decode {
                method: method.to_string(),
                message: e.to_string(),
            }),
            RpcReply::Fault { fault } => Err(RpcError::Fault { method: method.to_string(), fault }),
        }
    }
}
