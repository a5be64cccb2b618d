pub mod config;
pub mod error;
pub mod forecast;
pub mod formatting;
pub mod geometry;
pub mod gpx_export;
pub mod handlers;
pub mod models;
pub mod segments;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

use crate::config::PlannerConfig;
use crate::segments::SegmentPlanner;

pub use crate::segments::plan_segments;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<PlannerConfig>,
    pub planner: SegmentPlanner,
}

impl AppState {
    pub fn new(config: PlannerConfig) -> Self {
        let planner = SegmentPlanner::new(&config);
        Self {
            config: Arc::new(config),
            planner,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/segments", post(handlers::plan_segments_handler))
        .route("/api/health", get(handlers::health_handler))
        .layer(cors)
        .with_state(state)
}
