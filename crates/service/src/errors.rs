use models::errors::ModelError;
use rpc::{RpcError, RpcFault};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("hashing error: {0}")]
    Hash(String),
    #[error("no active user with email `{0}`")]
    UnknownOwner(String),
    #[error("model error: {0}")]
    Model(#[from] ModelError),
    #[error("remote call failed: {0}")]
    Remote(#[from] RpcError),
}

impl ServiceError {
    /// Unique-key or foreign-key violation reported by the store.
    pub fn is_constraint(&self) -> bool {
        matches!(self, ServiceError::Model(ModelError::Constraint(_)))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ServiceError::Validation(_) | ServiceError::Model(ModelError::Validation(_)))
    }
}

/// How a domain failure leaves a backend through the registry.
impl From<ServiceError> for RpcFault {
    fn from(err: ServiceError) -> Self {
        if err.is_validation() {
            RpcFault::invalid_argument(err.to_string())
        } else {
            RpcFault::internal(err.to_string())
        }
    }
}
