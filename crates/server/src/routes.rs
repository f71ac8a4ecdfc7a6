use std::sync::Arc;

use axum::{routing::get, Router};
use common::types::PING_BODY;
use rpc::RpcRegistry;
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

pub mod api_product;
pub mod api_user;
pub mod app_product;
pub mod app_user;

/// Liveness; answers without touching any backend.
pub async fn ping() -> &'static str {
    PING_BODY
}

fn trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
        .on_failure(DefaultOnFailure::new().level(Level::ERROR))
}

/// Public HTTP surface: `/ping` plus the process routes, with CORS and
/// request tracing.
pub fn public_router(routes: Router) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .merge(routes)
        .layer(CorsLayer::very_permissive())
        .layer(trace_layer())
}

/// Internal RPC listener; traced, without CORS.
pub fn rpc_router(registry: Arc<RpcRegistry>) -> Router {
    rpc::server::router(registry).layer(trace_layer())
}
