pub mod map;

use axum::{response::IntoResponse, routing::get, Json, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{config::Config, services::ApiClient};

pub use map::{all_items_map, item_events_map, item_history_map, ApiError};

/// Shared, read-only handler state. Each request builds its own map view.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub api: Arc<ApiClient>,
}

impl AppState {
    pub fn new(config: Config, api: ApiClient) -> Self {
        Self {
            config: Arc::new(config),
            api: Arc::new(api),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/health", get(health))
        .route("/api/map", get(all_items_map))
        .route("/api/map/:key", get(item_history_map))
        .route("/api/events/:key", get(item_events_map))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "scan-map-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
