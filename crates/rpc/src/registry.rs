use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::descriptor::{key_of, MethodDescriptor, RemoteMethod};
use crate::error::RegistryError;
use crate::wire::{RpcFault, RpcReply};

type BoxFuture = Pin<Box<dyn Future<Output = RpcReply> + Send>>;

/// Type-erased handler: raw JSON request in, reply envelope out.
pub type Handler = Arc<dyn Fn(Value) -> BoxFuture + Send + Sync>;

/// Collects handlers for one process. Registration mistakes are reported by
/// [`build`](Self::build), never at dispatch time.
#[derive(Default)]
pub struct RegistryBuilder {
    declared: Vec<MethodDescriptor>,
    handlers: HashMap<String, Handler>,
    duplicates: Vec<String>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Methods this process promises to serve.
    pub fn declare(mut self, methods: &[MethodDescriptor]) -> Self {
        self.declared.extend_from_slice(methods);
        self
    }

    pub fn register<M, F, Fut>(mut self, handler: F) -> Self
    where
        M: RemoteMethod,
        F: Fn(M::Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<M::Response, RpcFault>> + Send + 'static,
    {
        let key = M::descriptor().key();
        let method = key.clone();
        let erased: Handler = Arc::new(move |raw: Value| -> BoxFuture {
            let request = match serde_json::from_value::<M::Request>(raw) {
                Ok(request) => request,
                Err(err) => {
                    let fault = RpcFault::invalid_argument(format!("{method}: {err}"));
                    return Box::pin(async move { RpcReply::fault(fault) });
                }
            };
            let pending = handler(request);
            let method = method.clone();
            Box::pin(async move {
                match pending.await {
                    Ok(response) => match serde_json::to_value(response) {
                        Ok(payload) => RpcReply::ok(payload),
                        Err(err) => RpcReply::fault(RpcFault::internal(format!("{method}: {err}"))),
                    },
                    Err(fault) => RpcReply::fault(fault),
                }
            })
        });
        if self.handlers.insert(key.clone(), erased).is_some() {
            self.duplicates.push(key);
        }
        self
    }

    pub fn build(self) -> Result<RpcRegistry, RegistryError> {
        if let Some(dup) = self.duplicates.into_iter().next() {
            return Err(RegistryError::Duplicate(dup));
        }
        if let Some(missing) = self.declared.iter().find(|d| !self.handlers.contains_key(&d.key())) {
            return Err(RegistryError::Unregistered(missing.key()));
        }
        let registry = RpcRegistry { handlers: self.handlers };
        info!(methods = ?registry.methods(), "rpc registry built");
        Ok(registry)
    }
}

/// Immutable dispatch table keyed by `Service.Method`.
pub struct RpcRegistry {
    handlers: HashMap<String, Handler>,
}

impl RpcRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Unknown methods yield a `METHOD_NOT_FOUND` fault.
    pub async fn dispatch(&self, service: &str, method: &str, payload: Value) -> RpcReply {
        let key = key_of(service, method);
        let Some(handler) = self.handlers.get(&key) else {
            warn!(rpc = %key, "unknown remote method");
            return RpcReply::fault(RpcFault::method_not_found(&key));
        };
        debug!(rpc = %key, "dispatching");
        let reply = handler(payload).await;
        if let RpcReply::Fault { fault } = &reply {
            warn!(rpc = %key, code = %fault.code, message = %fault.message, "remote method faulted");
        }
        reply
    }

    pub fn contains(&self, method: &MethodDescriptor) -> bool {
        self.handlers.contains_key(&method.key())
    }

    /// Registered keys in sorted order.
    pub fn methods(&self) -> Vec<String> {
        self.handlers.keys().cloned().collect::<BTreeSet<_>>().into_iter().collect()
    }
}
