//! # unmark-api
//!
//! HTTP server for the unmark image proxy.
//!
//! Routes:
//! - `POST /api/remove-watermark`: base64 image in, PNG bytes out
//! - `GET /api/stats`: statistics record as JSON
//! - `GET /`: status page
//! - `GET /static/*`: dashboard assets
//! - `GET /health`: liveness and configured providers

pub mod config;
pub mod error;
pub mod handlers;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use uuid::Uuid;

use unmark_providers::ProviderChain;

pub use config::{KvConfig, ServerConfig, DEFAULT_STATIC_DIR};
pub use error::ApiError;
pub use services::{MemoryKvStore, RedisKvStore, StatisticsStore};

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub chain: Arc<ProviderChain>,
    pub stats: StatisticsStore,
}

impl AppState {
    pub fn new(chain: ProviderChain, stats: StatisticsStore) -> Self {
        Self {
            chain: Arc::new(chain),
            stats,
        }
    }
}

/// Build the application router with its middleware stack.
pub fn build_router(state: AppState, static_dir: &Path, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::status_page))
        .route("/health", get(handlers::health))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/remove-watermark", post(handlers::remove_watermark))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .with_state(state)
}
