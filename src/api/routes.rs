use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::service::LocationService;

use super::handlers::{get_location, health_check, AppState};

/// Build the HTTP router; the caller owns it and hands it to `axum::serve`
pub fn create_api_router(service: LocationService) -> Router {
    let state = Arc::new(AppState { service });

    Router::new()
        .route("/ip/location", get(get_location).post(get_location))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
