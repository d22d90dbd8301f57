use axum::{
    http::{Method, StatusCode},
    middleware as axum_middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::{providers::NewsProvider, recommendations::RecommendSettings},
};

pub mod news;
pub mod recommendations;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub news_provider: Arc<dyn NewsProvider>,
    pub settings: RecommendSettings,
}

impl AppState {
    pub fn new(news_provider: Arc<dyn NewsProvider>, settings: RecommendSettings) -> Self {
        Self {
            news_provider,
            settings,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(Arc::new(state))
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(cors),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/news/latest", get(news::latest))
        .route("/news/category", get(news::category))
        .route("/news/country", get(news::country))
        .route("/recommend", post(recommendations::recommend))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
