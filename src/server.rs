//! HTTP surface: JSON endpoints plus the static signage front end.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use common::{Error, SeatAvailability};
use serde::Serialize;
use serde_json::json;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::state::AppState;

/// Handler failure reported as `500 {message, error}`.
#[derive(Debug)]
pub struct ApiError {
    message: &'static str,
    source: Error,
}

impl ApiError {
    pub fn new(message: &'static str, source: Error) -> Self {
        Self { message, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.source.is_upstream() {
            warn!(error = %self.source, "{}", self.message);
        } else {
            error!(error = %self.source, "{}", self.message);
        }
        let body = json!({
            "message": self.message,
            "error": self.source.to_string(),
        });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

const GENERATE_FAILED: &str = "Failed to generate message.";
const SEATS_FAILED: &str = "Failed to fetch seat status.";

async fn generate_message(State(state): State<AppState>) -> Result<Json<MessageResponse>, ApiError> {
    info!("[/api/generate-message] Received a request.");
    let prepared = state.prepare_signage().await;

    let text = state
        .content
        .generate(&prepared.prompt)
        .await
        .map_err(|e| ApiError::new(GENERATE_FAILED, e))?;

    Ok(Json(MessageResponse {
        message: text.trim().to_string(),
        temperature: Some(prepared.weather.temperature_label),
    }))
}

async fn generate_recommendation(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    info!("[/api/generate-recommendation] Received a request.");
    let prepared = state
        .prepare_recommendation()
        .await
        .map_err(|e| ApiError::new(GENERATE_FAILED, e))?;

    let text = state
        .content
        .generate(&prepared.prompt)
        .await
        .map_err(|e| ApiError::new(GENERATE_FAILED, e))?;

    Ok(Json(MessageResponse {
        message: text.trim().to_string(),
        temperature: Some(prepared.weather.temperature_label),
    }))
}

async fn seat_status(State(state): State<AppState>) -> Result<Json<Vec<SeatAvailability>>, ApiError> {
    info!("[/api/seat-status] Received a request.");
    let slots = state
        .seats
        .fetch_slots()
        .await
        .map_err(|e| ApiError::new(SEATS_FAILED, e))?;

    let availability = seat_client::transform(&slots, state.local_offset);
    info!("Returning availability for {} slots", availability.len());
    Ok(Json(availability))
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// API routes, with static files served from `static_dir` when given.
pub fn router(state: AppState, static_dir: Option<&str>) -> Router {
    let api = Router::new()
        .route("/api/generate-message", get(generate_message))
        .route("/api/generate-recommendation", get(generate_recommendation))
        .route("/api/seat-status", get(seat_status))
        .route("/health", get(health_check))
        .with_state(state);

    let app = match static_dir {
        Some(dir) => api.fallback_service(ServeDir::new(dir)),
        None => api,
    };
    app.layer(TraceLayer::new_for_http())
}
