use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, info};

use super::AppState;
use crate::{
    libraries::{
        map_surface::GeoJsonSurface,
        map_view::{MapView, PathMode, Plottable},
    },
    models::{ErrorResponse, MapResponse},
    services::{FetchError, MapSession},
};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Upstream API request failed: {0}")]
    Upstream(#[from] FetchError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MissingToken => StatusCode::UNAUTHORIZED,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        };
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

/// Latest location of every item, markers only.
pub async fn all_items_map(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MapResponse>, ApiError> {
    let token = bearer_token(&headers)?;
    debug!("Rendering map for all items");

    let fetched = state.api.fetch_locations(None, token).await;
    render(&state, PathMode::MarkersOnly, fetched)
}

/// Location history of one item, joined by a path.
pub async fn item_history_map(
    State(state): State<AppState>,
    Path(key): Path<String>,
    headers: HeaderMap,
) -> Result<Json<MapResponse>, ApiError> {
    let token = bearer_token(&headers)?;
    debug!("Rendering location history for item {}", key);

    let fetched = state.api.fetch_locations(Some(&key), token).await;
    render(&state, PathMode::ConnectPoints, fetched)
}

/// Scan events of one item, joined by a path in slot order.
pub async fn item_events_map(
    State(state): State<AppState>,
    Path(key): Path<String>,
    headers: HeaderMap,
) -> Result<Json<MapResponse>, ApiError> {
    let token = bearer_token(&headers)?;
    debug!("Rendering scan events for item {}", key);

    let fetched = state.api.fetch_events(&key, token).await;
    render(&state, PathMode::ConnectPoints, fetched)
}

fn render<R: Plottable>(
    state: &AppState,
    mode: PathMode,
    fetched: Result<Vec<R>, FetchError>,
) -> Result<Json<MapResponse>, ApiError> {
    let config = &state.config;
    let mut session = MapSession::new(MapView::new(mode, config.map_fit_padding));
    session.mount(config.map_token(), |_| {
        GeoJsonSurface::new(config.initial_viewport())
    });

    session.apply(fetched)?;

    let response = session.to_response();
    info!(
        "Rendered {} markers from {} records",
        response.marker_count, response.record_count
    );
    Ok(Json(response))
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(ApiError::MissingToken)
}
