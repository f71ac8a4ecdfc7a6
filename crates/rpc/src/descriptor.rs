use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Identity of one remote procedure: `(service, method)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    pub service: &'static str,
    pub method: &'static str,
}

impl MethodDescriptor {
    pub const fn new(service: &'static str, method: &'static str) -> Self {
        Self { service, method }
    }

    /// Registry key, `Service.Method`.
    pub fn key(&self) -> String {
        key_of(self.service, self.method)
    }

    /// Request path on the RPC listener.
    pub fn path(&self) -> String {
        format!("/rpc/{}/{}", self.service, self.method)
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.service, self.method)
    }
}

pub(crate) fn key_of(service: &str, method: &str) -> String {
    format!("{service}.{method}")
}

/// Shape contract of a remote procedure, shared by client and server.
///
/// Lookups that may miss use `Option<_>` as their response; `None` travels
/// as a `null` payload.
pub trait RemoteMethod: Send + Sync + 'static {
    const SERVICE: &'static str;
    const METHOD: &'static str;
    type Request: Serialize + DeserializeOwned + Send + 'static;
    type Response: Serialize + DeserializeOwned + Send + 'static;

    fn descriptor() -> MethodDescriptor {
        MethodDescriptor::new(Self::SERVICE, Self::METHOD)
    }
}
