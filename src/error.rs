//! Error types for the countdown core

use std::result;

use thiserror::Error;

use crate::countdown::EngineState;

/// Errors reported by [`CountdownController`](crate::countdown::CountdownController)
/// and [`CountdownConfig`](crate::countdown::CountdownConfig).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CountdownError {
    /// Invalid construction parameters, e.g. a zero tick interval
    #[error("Invalid countdown configuration: {0}")]
    Configuration(String),

    /// Lifecycle call that is not valid from the current state
    #[error("Cannot {operation} a countdown that is {state}")]
    InvalidTransition {
        operation: &'static str,
        state: EngineState,
    },

    /// Any arming call after `dispose()`
    #[error("Cannot {operation} a disposed countdown")]
    Disposed { operation: &'static str },

    /// No runtime available to run the periodic ticker on
    #[error("Periodic scheduling unavailable: {0}")]
    SchedulingUnavailable(String),

    /// The per-instance state lock was poisoned by a panicking listener
    #[error("Countdown state unavailable: {0}")]
    StateUnavailable(String),
}

pub type Result<T> = result::Result<T, CountdownError>;
