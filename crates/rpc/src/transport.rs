use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use configs::ServiceTarget;
use serde_json::Value;
use tracing::debug;

use crate::descriptor::MethodDescriptor;
use crate::error::RpcError;
use crate::registry::RpcRegistry;
use crate::wire::RpcReply;

/// Moves one request envelope to a backend and brings its reply back.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn invoke(&self, method: MethodDescriptor, payload: Value) -> Result<RpcReply, RpcError>;
}

/// JSON over HTTP to a backend's RPC listener.
pub struct HttpTransport {
    base_url: String,
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(target: &ServiceTarget) -> Result<Self, RpcError> {
        Self::with_base_url(target.base_url(), target.timeout())
    }

    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RpcError> {
        let base_url = base_url.into();
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RpcError::Transport { method: base_url.clone(), message: e.to_string() })?;
        Ok(Self { base_url: base_url.trim_end_matches('/').to_string(), http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn invoke(&self, method: MethodDescriptor, payload: Value) -> Result<RpcReply, RpcError> {
        let url = format!("{}{}", self.base_url, method.path());
        debug!(%url, "rpc request");
        let resp = self
            .http
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| RpcError::Transport { method: method.to_string(), message: e.to_string() })?;
        let status = resp.status();
        // fault replies carry a non-2xx status but still hold an envelope
        let body = resp
            .bytes()
            .await
            .map_err(|e| RpcError::Transport { method: method.to_string(), message: e.to_string() })?;
        serde_json::from_slice::<RpcReply>(&body).map_err(|e| RpcError::Decode {
            method: method.to_string(),
            message: format!("status {status}: {e}"),
        })
    }
}

/// In-process transport straight into a registry.
#[derive(Clone)]
pub struct LocalTransport {
    registry: Arc<RpcRegistry>,
}

impl LocalTransport {
    pub fn new(registry: Arc<RpcRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl RpcTransport for LocalTransport {
    async fn invoke(&self, method: MethodDescriptor, payload: Value) -> Result<RpcReply, RpcError> {
        Ok(self.registry.dispatch(method.service, method.method, payload).await)
    }
}
