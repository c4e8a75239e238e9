//! Precise Countdown - A drift-free countdown timer
//! 
//! This library provides a countdown engine that anchors every reading to the
//! scheduled time of the first tick, a start/stop/restart controller that runs
//! it on a tokio ticker task, and an HTTP surface that renders its output.

pub mod config;
pub mod error;
pub mod countdown;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{CountdownError, Result};
pub use countdown::{
    CountdownConfig, CountdownController, CountdownEngine, CountdownEvent, CountdownListener, EngineState,
};
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
