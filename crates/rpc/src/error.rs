use thiserror::Error;

use crate::wire::{FaultCode, RpcFault};

/// Caller-side failure of a remote procedure.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("transport error calling {method}: {message}")]
    Transport { method: String, message: String },
    #[error("{method} answered with fault {fault}")]
    Fault { method: String, fault: RpcFault },
    #[error("cannot encode request for {method}: {source}")]
    Encode { method: String, source: serde_json::Error },
    #[error("malformed reply from {method}: {message}")]
    Decode { method: String, message: String },
    #[error("no backend configured for domain `{0}`")]
    UnknownDomain(String),
}

impl RpcError {
    pub fn fault_code(&self) -> Option<FaultCode> {
        match self {
            RpcError::Fault { fault, .. } => Some(fault.code),
            _ => None,
        }
    }

    pub fn is_method_not_found(&self) -> bool {
        self.fault_code() == Some(FaultCode::MethodNotFound)
    }
}

/// Startup-time registry inconsistency.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("{0} registered more than once")]
    Duplicate(String),
    #[error("{0} is declared but has no handler")]
    Unregistered(String),
}
