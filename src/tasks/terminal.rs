//! Foreground countdown rendered to the log

use tracing::{info, warn};

use crate::{
    countdown::{self, CountdownConfig, CountdownController, CountdownEvent},
    utils::{format_remaining, shutdown_signal},
};

/// Run a single countdown in the foreground until it finishes or a shutdown
/// signal arrives. Returns the events that were delivered.
pub async fn run_in_terminal(config: CountdownConfig) -> anyhow::Result<Vec<CountdownEvent>> {
    let (listener, mut events) = countdown::channel();
    let mut controller = CountdownController::new(config, listener);
    controller.start()?;

    info!(
        "Counting down {} in steps of {}ms (Ctrl+C to cancel)",
        format_remaining(config.duration_ms()),
        config.interval_ms()
    );

    let mut delivered = Vec::new();
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event @ CountdownEvent::Tick { remaining_ms }) => {
                    info!("{}", format_remaining(remaining_ms));
                    delivered.push(event);
                }
                Some(CountdownEvent::Finished) => {
                    info!("Countdown finished");
                    delivered.push(CountdownEvent::Finished);
                    break;
                }
                None => {
                    warn!("Countdown event channel closed unexpectedly");
                    break;
                }
            },
            _ = &mut shutdown => {
                controller.cancel()?;
                info!("Countdown cancelled by signal");
                break;
            }
        }
    }

    controller.dispose();
    Ok(delivered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn runs_until_finished() {
        let config = CountdownConfig::new(2_000, 1_000, 0).unwrap();
        let events = run_in_terminal(config).await.unwrap();
        assert_eq!(
            events,
            vec![
                CountdownEvent::Tick { remaining_ms: 2_000 },
                CountdownEvent::Tick { remaining_ms: 1_000 },
                CountdownEvent::Finished,
            ]
        );
    }
}
