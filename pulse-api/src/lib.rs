//! pulse-api library interface
//!
//! Exposes the router and application state for integration testing.

pub mod api;
pub mod db;
pub mod error;
pub mod pipeline;
pub mod services;
pub mod validate;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::services::gemini::ReviewAnalyzer;
use crate::services::rate_limiter::SlidingWindowLimiter;

/// Application state shared across handlers.
///
/// Everything here is constructed once in `main` and injected; handlers
/// never reach for ambient singletons.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Generative model client (or a stub in tests)
    pub analyzer: Arc<dyn ReviewAnalyzer>,
    /// Per-client admission control
    pub limiter: Arc<SlidingWindowLimiter>,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        analyzer: Arc<dyn ReviewAnalyzer>,
        limiter: Arc<SlidingWindowLimiter>,
    ) -> Self {
        Self {
            db,
            analyzer,
            limiter,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::post;

    Router::new()
        .route("/submit-review", post(api::submit_review))
        .route("/generate-report", post(api::generate_report))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
