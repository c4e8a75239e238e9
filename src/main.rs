//! Precise Countdown - A drift-free countdown timer
//! 
//! This is the main entry point for the precise-countdown application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use precise_countdown::{
    config::Config,
    state::AppState,
    api::create_router,
    tasks::{run_in_terminal, view_updater_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("precise_countdown={},tower_http=info", config.log_level()))
        .init();

    let countdown = config.countdown_config()?;

    info!("Starting precise-countdown v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: duration={}ms, interval={}ms, delay={}ms",
          countdown.duration_ms(), countdown.interval_ms(), countdown.delay_ms());

    if config.once {
        let events = run_in_terminal(countdown).await?;
        info!("Delivered {} countdown events", events.len());
        return Ok(());
    }

    // Create application state
    let (state, updates) = AppState::new(config.port, config.host.clone(), countdown);
    let state = Arc::new(state);

    // Start the view updater background task
    let view_state = Arc::clone(&state);
    tokio::spawn(async move {
        view_updater_task(view_state, updates).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start   - Start a countdown (optional body: {{\"duration_ms\": n}})");
    info!("  POST /cancel  - Cancel the current countdown");
    info!("  POST /restart - Restart the current countdown");
    info!("  GET  /status  - Current countdown view");
    info!("  GET  /health  - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    state.dispose()?;
    info!("Server shutdown complete");
    Ok(())
}
