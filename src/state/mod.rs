//! State management module
//! 
//! This module contains the application state and the view it renders.

pub mod app_state;
pub mod countdown_view;

// Re-export main types
pub use app_state::{AppState, CommandOutcome};
pub use countdown_view::{CountdownView, SessionListener, ViewUpdate, LAST_TEN_SECONDS_MS};
