//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    countdown::EngineState,
    state::{CommandOutcome, CountdownView},
};

/// Optional body of POST /start
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartRequest {
    pub duration_ms: Option<u64>,
}

/// API response structure for lifecycle endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub session: u64,
    pub state: EngineState,
    pub duration_ms: u64,
}

impl ApiResponse {
    /// Create a successful response for a lifecycle command
    pub fn ok(message: String, outcome: CommandOutcome) -> Self {
        Self {
            status: "ok".to_string(),
            message,
            timestamp: Utc::now(),
            session: outcome.session,
            state: outcome.state,
            duration_ms: outcome.duration_ms,
        }
    }
}

/// Error body returned alongside a non-2xx status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(message: String) -> Self {
        Self {
            status: "error".to_string(),
            message,
            timestamp: Utc::now(),
        }
    }
}

/// Status response with the rendered countdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub view: CountdownView,
    /// State reported by the controller itself, `None` before the first start
    pub engine_state: Option<EngineState>,
    pub interval_ms: u64,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
