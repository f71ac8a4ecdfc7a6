use std::fmt;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Reply envelope: `{"status":"ok","payload":..}` or
/// `{"status":"fault","fault":{"code":..,"message":..}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RpcReply {
    Ok {
        #[serde(default)]
        payload: Value,
    },
    Fault { fault: RpcFault },
}

impl RpcReply {
    pub fn ok(payload: Value) -> Self {
        RpcReply::Ok { payload }
    }

    pub fn fault(fault: RpcFault) -> Self {
        RpcReply::Fault { fault }
    }

    /// HTTP status the RPC listener answers with.
    pub fn http_status(&self) -> StatusCode {
        match self {
            RpcReply::Ok { .. } => StatusCode::OK,
            RpcReply::Fault { fault } => fault.code.http_status(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FaultCode {
    MethodNotFound,
    InvalidArgument,
    Internal,
}

impl FaultCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FaultCode::MethodNotFound => "METHOD_NOT_FOUND",
            FaultCode::InvalidArgument => "INVALID_ARGUMENT",
            FaultCode::Internal => "INTERNAL",
        }
    }

    pub fn http_status(&self) -> StatusCode {
        match self {
            FaultCode::MethodNotFound => StatusCode::NOT_FOUND,
            FaultCode::InvalidArgument => StatusCode::BAD_REQUEST,
            FaultCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for FaultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{code}: {message}")]
pub struct RpcFault {
    pub code: FaultCode,
    pub message: String,
}

impl RpcFault {
    pub fn new(code: FaultCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(FaultCode::MethodNotFound, format!("no handler registered for {method}"))
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(FaultCode::InvalidArgument, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(FaultCode::Internal, message)
    }
}
