use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorBody;
use configs::ConfigError;
use models::errors::ModelError;
use rpc::{RegistryError, RpcError};
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

/// Failure of an HTTP handler. Only the status and a fixed, generic body
/// reach the client; details go to the log.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request")]
    Validation,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("remote call failed: {0}")]
    Remote(#[from] RpcError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        if err.is_validation() {
            return ApiError::Validation;
        }
        if err.is_constraint() {
            return ApiError::Conflict(err.to_string());
        }
        match err {
            ServiceError::UnknownOwner(_) => ApiError::NotFound("owner"),
            ServiceError::Remote(rpc) => ApiError::Remote(rpc),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Remote(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        let status = self.status().as_u16();
        match self {
            ApiError::Validation => ErrorBody::invalid_parameter(),
            ApiError::NotFound(what) => ErrorBody::new(status, &format!("{what} not found"), "not found"),
            ApiError::Conflict(_) => ErrorBody::new(status, "resource already exists", "conflict"),
            ApiError::Remote(_) => ErrorBody::new(status, "upstream service unavailable", "bad gateway"),
            ApiError::Internal(_) => ErrorBody::new(status, "internal server error", "internal error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, status = status.as_u16(), "request failed");
        } else if status == StatusCode::CONFLICT {
            warn!(error = %self, "request conflicts with stored state");
        }
        (status, Json(self.body())).into_response()
    }
}

/// Anything that prevents a process from reaching `Serving`.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database unavailable: {0}")]
    Database(#[from] ModelError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Rpc(#[from] RpcError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("cannot bind {name} on {addr}: {source}")]
    Bind { name: String, addr: String, source: std::io::Error },
    #[error("listener {name} stopped: {source}")]
    Serve { name: String, source: std::io::Error },
    #[error("listener task failed: {0}")]
    Join(String),
}
