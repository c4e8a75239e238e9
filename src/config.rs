//! Configuration and CLI argument handling

use clap::Parser;

use crate::{countdown::CountdownConfig, error::Result};

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "precise-countdown")]
#[command(about = "A drift-free countdown timer with an HTTP control surface")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Default countdown length in milliseconds
    #[arg(short, long, default_value = "75000")]
    pub duration_ms: u64,

    /// Time between ticks in milliseconds
    #[arg(short, long, default_value = "1000")]
    pub interval_ms: u64,

    /// Delay before the first tick in milliseconds
    #[arg(long, default_value = "500")]
    pub delay_ms: u64,

    /// Run a single countdown in the terminal instead of serving HTTP
    #[arg(long)]
    pub once: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Validated countdown parameters
    pub fn countdown_config(&self) -> Result<CountdownConfig> {
        CountdownConfig::new(self.duration_ms, self.interval_ms, self.delay_ms)
    }
}
