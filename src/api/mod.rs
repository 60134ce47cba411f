//! HTTP API module - REST endpoints

mod posts;

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::pipeline::Pipeline;
pub use posts::{ErrorResponse, ImagePayload, PostResponse};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

/// Build the API router
pub fn router(pipeline: Arc<Pipeline>) -> Router {
    let state = AppState { pipeline };

    Router::new()
        .route("/health", get(health_check))
        .route("/", get(root))
        .merge(posts::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Root endpoint
async fn root() -> impl IntoResponse {
    Json(RootResponse {
        name: "mycm",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct RootResponse {
    name: &'static str,
    version: &'static str,
}

/// Health check endpoint
///
/// Providers are not probed; that would spend quota.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        text_provider: state.pipeline.composer().provider().provider_name(),
        image_provider: state.pipeline.fetcher().provider().provider_name(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    text_provider: &'static str,
    image_provider: &'static str,
}
