//! Countdown core
//!
//! [`CountdownEngine`] does the remaining-time math for one run;
//! [`CountdownController`] drives it through its lifecycle on a tokio ticker
//! task and reports to a [`CountdownListener`].

pub mod config;
pub mod controller;
pub mod engine;
pub mod listener;
pub mod state;
mod ticker;

// Re-export main types
pub use config::CountdownConfig;
pub use controller::CountdownController;
pub use engine::{CountdownEngine, Fire};
pub use listener::{channel, ChannelListener, CountdownEvent, CountdownListener, FnListener};
pub use state::EngineState;
