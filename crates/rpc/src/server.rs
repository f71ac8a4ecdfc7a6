use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::Value;

use crate::registry::RpcRegistry;
use crate::wire::{RpcFault, RpcReply};

/// RPC listener routes. Mounted only on the internal listener, never next
/// to the public HTTP routes.
pub fn router(registry: Arc<RpcRegistry>) -> Router {
    Router::new()
        .route("/rpc/:service/:method", post(dispatch))
        .with_state(registry)
}

async fn dispatch(
    State(registry): State<Arc<RpcRegistry>>,
    Path((service, method)): Path<(String, String)>,
    body: Bytes,
) -> Response {
    let payload = if body.is_empty() {
        Value::Null
    } else {
        match serde_json::from_slice::<Value>(&body) {
            Ok(v) => v,
            Err(e) => return reply(RpcReply::fault(RpcFault::invalid_argument(format!("malformed json: {e}")))),
        }
    };
    reply(registry.dispatch(&service, &method, payload).await)
}

fn reply(reply: RpcReply) -> Response {
    (reply.http_status(), Json(reply)).into_response()
}
