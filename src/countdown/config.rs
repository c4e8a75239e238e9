//! Fixed parameters of a countdown instance

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CountdownError, Result};

/// Duration, tick interval and initial delay, fixed for an instance's life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownConfig {
    duration_ms: u64,
    interval_ms: u64,
    delay_ms: u64,
}

impl CountdownConfig {
    /// Validate and build a configuration. The interval must be non-zero.
    pub fn new(duration_ms: u64, interval_ms: u64, delay_ms: u64) -> Result<Self> {
        if interval_ms == 0 {
            return Err(CountdownError::Configuration(
                "tick interval must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            duration_ms,
            interval_ms,
            delay_ms,
        })
    }

    /// Same interval and delay, different total duration
    pub fn with_duration(&self, duration_ms: u64) -> Self {
        Self { duration_ms, ..*self }
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}
