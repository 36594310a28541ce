//! Creep Strain Prediction App
//!
//! Collects concrete mixture and environment parameters, runs them through a
//! pre-fitted preprocessing transform and a pre-trained regression model,
//! and shows the predicted creep strain.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   InputRecord   ┌──────────────────────────────┐
//! │  Input       │ ──────────────▶ │  Pipeline                    │
//! │  Assembler   │                 │  transform ──▶ infer ──▶ [0] │
//! │  (form)      │ ◀────────────── │  (ONNX artifacts, read-only) │
//! └──────────────┘  value / error  └──────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod render;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};

pub use error::{AppError, AppResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: pipeline::Pipeline,
    pub config: config::Config,
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    // Interactive page
    let page_routes = Router::new()
        .route("/", get(handlers::page::index).post(handlers::page::preview))
        .route("/predict", post(handlers::page::predict));

    // JSON API
    let api_routes = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/schema", get(handlers::predict::schema))
        .route("/api/v1/predict", post(handlers::predict::predict));

    Router::new()
        .merge(page_routes)
        .merge(api_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
