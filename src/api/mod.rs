//! API module for the fleet dashboard
//!
//! REST interface over the allocation calculator and the trip analytics.

pub mod handlers;
pub mod service;

pub use service::{DashboardService, DatasetKind};

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn router(service: Arc<DashboardService>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/api/v1/health", get(handlers::health))
        // Calculator
        .route("/api/v1/fleet", get(handlers::get_fleet))
        .route("/api/v1/allocate", post(handlers::allocate))
        // Uploads
        .route("/api/v1/datasets/history", put(handlers::put_history))
        .route("/api/v1/datasets/current", put(handlers::put_current))
        // Descriptive analytics
        .route("/api/v1/summary", get(handlers::get_summary))
        .route("/api/v1/stats/daily", get(handlers::get_daily_stats))
        .route("/api/v1/plates/monthly", get(handlers::get_plates_monthly))
        .route("/api/v1/plates/types", get(handlers::get_plates_by_type))
        // Similar days
        .route("/api/v1/similar", get(handlers::find_similar))
        // State and middleware
        .with_state(service)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
