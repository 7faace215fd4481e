use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::{HealthResponse, LocationResponse};
use crate::service::{LocateErrorKind, LocationService};

pub struct AppState {
    pub service: LocationService,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Resolve the `ip` query parameter to a location.
///
/// Query pairs are taken as a list so a repeated `ip` resolves the first
/// value instead of failing deserialization.
pub async fn get_location(
    State(state): State<Arc<AppState>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<LocationResponse>, ApiError> {
    let Query(pairs) =
        query.map_err(|e| error_response(StatusCode::BAD_REQUEST, e.body_text()))?;

    let ip = match first_value(&pairs, "ip") {
        Some(ip) if !ip.is_empty() => ip,
        _ => {
            return Err(error_response(
                StatusCode::BAD_REQUEST,
                "IP address is required",
            ))
        }
    };

    match state.service.locate(ip) {
        Ok(range) => {
            tracing::debug!(ip = %ip, lower = range.lower, upper = range.upper, "location found");
            Ok(Json(LocationResponse::from(range)))
        }
        Err(err) => match err.kind {
            LocateErrorKind::InvalidFormat(e) => {
                tracing::debug!(ip = %ip, error = %e, "rejected malformed address");
                Err(error_response(StatusCode::BAD_REQUEST, e.to_string()))
            }
            LocateErrorKind::NotFound => Err(error_response(
                StatusCode::NOT_FOUND,
                "Location not found for the given IP",
            )),
            LocateErrorKind::Store(e) => {
                tracing::warn!(ip = %ip, stage = %err.stage, error = %e, "range lookup failed");
                Err(error_response(StatusCode::BAD_REQUEST, e.to_string()))
            }
        },
    }
}

fn first_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
