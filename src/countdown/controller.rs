//! Start/stop/restart/dispose state machine around the countdown engine
//!
//! A controller owns one countdown sequence. Arming spawns a ticker task on
//! the current tokio runtime; the engine state it drives is shared with that
//! task only, behind a mutex scoped to this instance.
//!
//! Misuse policy:
//! - `start()` while running or cancelled is rejected with
//!   [`CountdownError::InvalidTransition`]; nothing is re-armed.
//! - `start()`/`restart()` after `dispose()` return [`CountdownError::Disposed`].
//! - `stop()` when not running and `dispose()` when already disposed are no-ops.

use std::sync::{Arc, Mutex, MutexGuard};
use tokio::{runtime::Handle, task::JoinHandle};
use tracing::{debug, info, warn};

use super::{
    config::CountdownConfig,
    listener::CountdownListener,
    state::EngineState,
    ticker::{self, Shared},
};
use crate::error::{CountdownError, Result};

pub struct CountdownController {
    config: CountdownConfig,
    shared: Arc<Mutex<Shared>>,
    listener: Arc<dyn CountdownListener>,
    ticker: Option<JoinHandle<()>>,
    was_started: bool,
    disposed: bool,
}

impl CountdownController {
    /// Create an idle controller. Nothing is scheduled until `start()`.
    pub fn new<L: CountdownListener>(config: CountdownConfig, listener: L) -> Self {
        Self::with_listener(config, Arc::new(listener))
    }

    /// Like [`new`](Self::new), for a listener that is already shared.
    pub fn with_listener(config: CountdownConfig, listener: Arc<dyn CountdownListener>) -> Self {
        Self {
            config,
            shared: Arc::new(Mutex::new(Shared::new(config.duration_ms()))),
            listener,
            ticker: None,
            was_started: false,
            disposed: false,
        }
    }

    pub fn config(&self) -> &CountdownConfig {
        &self.config
    }

    pub fn state(&self) -> Result<EngineState> {
        Ok(lock(&self.shared)?.state)
    }

    /// Last remaining time reported in the current run, if any
    pub fn remaining_ms(&self) -> Result<Option<u64>> {
        Ok(lock(&self.shared)?.engine.remaining_ms())
    }

    pub fn was_started(&self) -> bool {
        self.was_started
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Begin a countdown from `Idle` or `Finished`.
    pub fn start(&mut self) -> Result<()> {
        if self.disposed {
            return Err(CountdownError::Disposed { operation: "start" });
        }

        match self.state()? {
            state @ (EngineState::Running | EngineState::Cancelled) => {
                warn!("Rejecting start of a {} countdown", state);
                Err(CountdownError::InvalidTransition {
                    operation: "start",
                    state,
                })
            }
            EngineState::Idle | EngineState::Finished => self.arm("start"),
        }
    }

    /// Start over with the full duration.
    ///
    /// A running countdown keeps its schedule and treats its next fire as the
    /// first fire of a new run. A cancelled or finished one is re-armed.
    pub fn restart(&mut self) -> Result<()> {
        if self.disposed {
            return Err(CountdownError::Disposed { operation: "restart" });
        }
        if !self.was_started {
            return self.start();
        }

        let shared = Arc::clone(&self.shared);
        let mut guard = lock(&shared)?;
        match guard.state {
            EngineState::Running => {
                guard.engine.request_restart();
                info!("Restart requested, next fire begins a new run");
                Ok(())
            }
            EngineState::Idle | EngineState::Cancelled | EngineState::Finished => {
                drop(guard);
                self.arm("restart")
            }
        }
    }

    /// Cancel a running countdown. No `on_finished()` follows.
    ///
    /// Once this returns, no further callback of the run is delivered.
    pub fn stop(&mut self) -> Result<()> {
        if self.disposed {
            return Ok(());
        }

        let shared = Arc::clone(&self.shared);
        let mut guard = lock(&shared)?;
        if !guard.state.is_running() {
            debug!("Ignoring stop of a {} countdown", guard.state);
            return Ok(());
        }
        guard.state = EngineState::Cancelled;
        guard.generation = guard.generation.wrapping_add(1);
        drop(guard);

        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        info!("Countdown cancelled");
        Ok(())
    }

    /// Alias of [`stop`](Self::stop).
    pub fn cancel(&mut self) -> Result<()> {
        self.stop()
    }

    /// Release the ticker for good. Terminal.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        match self.shared.lock() {
            Ok(mut guard) => {
                guard.generation = guard.generation.wrapping_add(1);
                if guard.state.is_running() {
                    guard.state = EngineState::Cancelled;
                }
            }
            Err(e) => warn!("Disposing countdown with poisoned state: {}", e),
        }

        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        debug!("Countdown disposed");
    }

    /// Begin a fresh run on a new ticker task.
    fn arm(&mut self, operation: &'static str) -> Result<()> {
        let runtime = Handle::try_current().map_err(|e| CountdownError::SchedulingUnavailable(e.to_string()))?;

        let shared = Arc::clone(&self.shared);
        let mut guard = lock(&shared)?;
        guard.engine.reset();
        guard.state = EngineState::Running;
        guard.generation = guard.generation.wrapping_add(1);
        let generation = guard.generation;
        drop(guard);

        if let Some(previous) = self.ticker.take() {
            previous.abort();
        }
        self.ticker = Some(runtime.spawn(ticker::run(
            Arc::clone(&self.shared),
            Arc::clone(&self.listener),
            generation,
            self.config.delay(),
            self.config.interval(),
        )));
        self.was_started = true;

        info!(
            "Countdown {}: {}ms every {}ms after {}ms",
            operation,
            self.config.duration_ms(),
            self.config.interval_ms(),
            self.config.delay_ms()
        );
        Ok(())
    }
}

impl Drop for CountdownController {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn lock(shared: &Mutex<Shared>) -> Result<MutexGuard<'_, Shared>> {
    shared
        .lock()
        .map_err(|e| CountdownError::StateUnavailable(format!("Failed to lock countdown state: {}", e)))
}
