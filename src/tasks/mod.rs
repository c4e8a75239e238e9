//! Background tasks module
//! 
//! This module contains background tasks that run alongside the HTTP server.

pub mod terminal;
pub mod view_updater;

// Re-export main functions
pub use terminal::run_in_terminal;
pub use view_updater::view_updater_task;
