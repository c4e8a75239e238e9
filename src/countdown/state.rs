//! Lifecycle state of a countdown instance

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a countdown is in its lifecycle.
///
/// ```text
/// Idle -> Running -> (Cancelled | Finished) -> Running (restart)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineState {
    #[default]
    Idle,
    Running,
    Cancelled,
    Finished,
}

impl EngineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineState::Idle => "idle",
            EngineState::Running => "running",
            EngineState::Cancelled => "cancelled",
            EngineState::Finished => "finished",
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, EngineState::Running)
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
