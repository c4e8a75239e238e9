//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::{error::CountdownError, state::AppState};
use super::responses::{ApiResponse, ErrorResponse, HealthResponse, StartRequest, StatusResponse};

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map a countdown error onto an HTTP status and error body
fn reject(action: &str, e: CountdownError) -> ApiError {
    let status = match e {
        CountdownError::InvalidTransition { .. } | CountdownError::Disposed { .. } => StatusCode::CONFLICT,
        CountdownError::Configuration(_) => StatusCode::BAD_REQUEST,
        CountdownError::SchedulingUnavailable(_) | CountdownError::StateUnavailable(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    if status.is_server_error() {
        error!("Failed to {} countdown: {}", action, e);
    } else {
        warn!("Rejected {} request: {}", action, e);
    }
    (status, Json(ErrorResponse::new(e.to_string())))
}

/// Parse the optional body of POST /start. An empty body means "use the defaults".
fn parse_start_request(body: &[u8]) -> Result<StartRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(StartRequest::default());
    }

    serde_json::from_slice(body).map_err(|e| {
        warn!("Rejected start request with invalid body: {}", e);
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(format!("Invalid start request: {}", e))),
        )
    })
}

/// Handle POST /start - Start a new countdown, replacing any current one
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ApiResponse>, ApiError> {
    let duration_ms = parse_start_request(&body)?.duration_ms;

    let outcome = state
        .start_countdown(duration_ms)
        .map_err(|e| reject("start", e))?;
    info!("Start endpoint called - session {} counting down {}ms", outcome.session, outcome.duration_ms);
    Ok(Json(ApiResponse::ok("Countdown started".to_string(), outcome)))
}

/// Handle POST /cancel - Cancel the current countdown
pub async fn cancel_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, ApiError> {
    let outcome = state.cancel_countdown().map_err(|e| reject("cancel", e))?;
    info!("Cancel endpoint called - session {} is {}", outcome.session, outcome.state);
    Ok(Json(ApiResponse::ok("Countdown cancelled".to_string(), outcome)))
}

/// Handle POST /restart - Restart the current countdown
pub async fn restart_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, ApiError> {
    let outcome = state.restart_countdown().map_err(|e| reject("restart", e))?;
    info!("Restart endpoint called - session {} restarted", outcome.session);
    Ok(Json(ApiResponse::ok("Countdown restarted".to_string(), outcome)))
}

/// Handle GET /status - Return the rendered countdown
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, ApiError> {
    let engine_state = state.engine_state().map_err(|e| reject("inspect", e))?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        view: state.get_view(),
        engine_state,
        interval_ms: state.defaults.interval_ms(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
