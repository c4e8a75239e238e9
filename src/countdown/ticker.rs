//! Periodic firing task for one armed run

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use super::{
    engine::{CountdownEngine, Fire},
    listener::CountdownListener,
    state::EngineState,
};

/// Instance state shared between a controller and its ticker task.
#[derive(Debug)]
pub(crate) struct Shared {
    pub(crate) engine: CountdownEngine,
    pub(crate) state: EngineState,
    /// Bumped on every arm, stop and dispose; a ticker only fires while its
    /// own generation is current
    pub(crate) generation: u64,
}

impl Shared {
    pub(crate) fn new(duration_ms: u64) -> Self {
        Self {
            engine: CountdownEngine::new(duration_ms),
            state: EngineState::Idle,
            generation: 0,
        }
    }
}

/// Fire at `delay`, then every `period`, until the run finishes or is
/// superseded.
///
/// Missed fires are delivered in a burst with their original scheduled times,
/// which keeps the cadence fixed-rate.
pub(crate) async fn run(
    shared: Arc<Mutex<Shared>>,
    listener: Arc<dyn CountdownListener>,
    generation: u64,
    delay: Duration,
    period: Duration,
) {
    let origin = Instant::now();
    let mut ticks = time::interval_at(origin + delay, period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Burst);

    debug!("Ticker {} armed: delay={:?}, period={:?}", generation, delay, period);

    loop {
        let scheduled = ticks.tick().await;
        let scheduled_ms = u64::try_from(scheduled.duration_since(origin).as_millis()).unwrap_or(u64::MAX);
        if !fire(&shared, listener.as_ref(), generation, scheduled_ms) {
            break;
        }
    }

    debug!("Ticker {} stopped", generation);
}

/// Run one fire. Returns `false` once this ticker has nothing left to do.
fn fire(shared: &Mutex<Shared>, listener: &dyn CountdownListener, generation: u64, scheduled_ms: u64) -> bool {
    let mut shared = match shared.lock() {
        Ok(guard) => guard,
        Err(e) => {
            error!("Countdown state poisoned, stopping ticker {}: {}", generation, e);
            return false;
        }
    };

    if shared.generation != generation || !shared.state.is_running() {
        debug!("Ticker {} superseded, dropping fire at {}ms", generation, scheduled_ms);
        return false;
    }

    match shared.engine.on_fire(scheduled_ms) {
        Some(Fire::Tick(remaining_ms)) => {
            debug!("Tick at {}ms: {}ms remaining", scheduled_ms, remaining_ms);
            listener.on_tick(remaining_ms);
            true
        }
        Some(Fire::Finished) => {
            shared.state = EngineState::Finished;
            info!("Countdown finished at {}ms", scheduled_ms);
            listener.on_finished();
            false
        }
        None => true,
    }
}
