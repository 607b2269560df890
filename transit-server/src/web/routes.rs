//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::info;

use crate::domain::GeoPoint;
use crate::planner::RoutePlanner;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/route", post(get_route))
        .route("/stops/search", get(search_stops))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Plan routes between two coordinates.
///
/// Runs the four mode-variant searches on a blocking thread and returns
/// the structured response, or NOT_FOUND when nothing connects the
/// endpoints and the direct walk is too long to offer.
async fn get_route(
    State(state): State<AppState>,
    Json(request): Json<RouteRequest>,
) -> Result<Json<RouteResponse>, AppError> {
    let origin = validate_coordinate(request.origin, "origin")?;
    let destination = validate_coordinate(request.destination, "destination")?;

    info!(%origin, %destination, "route request");

    let graph = state.graph.clone();
    let config = state.config.clone();
    let results = tokio::task::spawn_blocking(move || {
        RoutePlanner::new(&graph, &config).plan(origin, destination)
    })
    .await
    .map_err(|e| AppError::Internal {
        message: format!("search task failed: {e}"),
    })?;

    if !results.iter().any(|r| r.is_found()) {
        return Err(AppError::NotFound {
            message: "no path found between the specified locations".to_string(),
        });
    }

    Ok(Json(RouteResponse::build(
        request.origin,
        request.destination,
        &results,
    )))
}

/// Search stops by GTFS id or name.
async fn search_stops(
    State(state): State<AppState>,
    Query(request): Query<StopSearchRequest>,
) -> Result<Json<StopSearchResponse>, AppError> {
    if request.q.trim().is_empty() {
        return Err(AppError::BadRequest {
            message: "query must not be empty".to_string(),
        });
    }
    let limit = request.limit.unwrap_or(10).min(50);
    let stops = state
        .graph
        .search_stops(&request.q, limit)
        .into_iter()
        .map(|id| StopResult::from_node(&state.graph, id))
        .collect();
    Ok(Json(StopSearchResponse { stops }))
}

fn validate_coordinate(point: LatLon, field: &str) -> Result<GeoPoint, AppError> {
    let valid = point.lat.is_finite()
        && point.lon.is_finite()
        && (-90.0..=90.0).contains(&point.lat)
        && (-180.0..=180.0).contains(&point.lon);
    if !valid {
        return Err(AppError::BadRequest {
            message: format!("invalid {field} coordinates ({}, {})", point.lat, point.lon),
        });
    }
    Ok(point.into())
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl AppError {
    fn code(&self) -> &'static str {
        match self {
            AppError::BadRequest { .. } => "BAD_REQUEST",
            AppError::NotFound { .. } => "NOT_FOUND",
            AppError::Internal { .. } => "INTERNAL",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message.clone()),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message.clone()),
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(%status, message, "request failed");
        }

        let body = Json(ErrorResponse {
            code: self.code().to_string(),
            error: message,
        });
        (status, body).into_response()
    }
}
