//! Main application state management

use std::{
    sync::{Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use crate::{
    countdown::{CountdownConfig, CountdownController, EngineState},
    error::{CountdownError, Result},
};
use super::{CountdownView, SessionListener, ViewUpdate};

/// The countdown currently owned by the application, if any
#[derive(Default)]
struct Slot {
    session: u64,
    controller: Option<CountdownController>,
}

/// Result of a lifecycle command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutcome {
    pub session: u64,
    pub state: EngineState,
    pub duration_ms: u64,
}

/// Main application state: the active countdown and its rendered view
pub struct AppState {
    /// Cadence and default duration for new countdowns
    pub defaults: CountdownConfig,
    slot: Mutex<Slot>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Ordered stream of view changes, consumed by the view updater task
    pub update_tx: mpsc::UnboundedSender<ViewUpdate>,
    /// Latest view, written only by the view updater task
    pub view_tx: watch::Sender<CountdownView>,
    /// Keep the receiver alive to prevent channel closure
    pub _view_rx: watch::Receiver<CountdownView>,
}

impl AppState {
    /// Create the application state along with the receiving end of its view updates
    pub fn new(port: u16, host: String, defaults: CountdownConfig) -> (Self, mpsc::UnboundedReceiver<ViewUpdate>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(CountdownView::new());

        let state = Self {
            defaults,
            slot: Mutex::new(Slot::default()),
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            update_tx,
            view_tx,
            _view_rx: view_rx,
        };
        (state, update_rx)
    }

    /// Replace any existing countdown with a new one and start it
    pub fn start_countdown(&self, duration_ms: Option<u64>) -> Result<CommandOutcome> {
        let config = match duration_ms {
            Some(duration_ms) => self.defaults.with_duration(duration_ms),
            None => self.defaults,
        };

        let mut slot = self.lock_slot()?;
        let outcome = self.start_in(&mut slot, config)?;
        drop(slot);

        self.record_action("start");
        Ok(outcome)
    }

    /// Cancel the current countdown. A no-op when nothing is running.
    pub fn cancel_countdown(&self) -> Result<CommandOutcome> {
        let mut slot = self.lock_slot()?;
        let session = slot.session;
        let outcome = match slot.controller.as_mut() {
            Some(controller) => {
                controller.cancel()?;
                let state = controller.state()?;
                // Posted after cancel() returns, so it lands behind every tick of the run
                self.post(ViewUpdate::Stopped { session, state });
                CommandOutcome {
                    session,
                    state,
                    duration_ms: controller.config().duration_ms(),
                }
            }
            None => CommandOutcome {
                session,
                state: EngineState::Idle,
                duration_ms: self.defaults.duration_ms(),
            },
        };
        drop(slot);

        info!("Countdown session {} is {}", outcome.session, outcome.state);
        self.record_action("cancel");
        Ok(outcome)
    }

    /// Restart the current countdown, or start a default one if there is none
    pub fn restart_countdown(&self) -> Result<CommandOutcome> {
        let mut slot = self.lock_slot()?;
        let session = slot.session;
        let outcome = match slot.controller.as_mut() {
            Some(controller) => {
                let duration_ms = controller.config().duration_ms();
                controller.restart()?;
                // Every tick delivered after restart() returns belongs to the new run
                self.post(ViewUpdate::Armed { session, duration_ms });
                CommandOutcome {
                    session,
                    state: controller.state()?,
                    duration_ms,
                }
            }
            None => self.start_in(&mut slot, self.defaults)?,
        };
        drop(slot);

        self.record_action("restart");
        Ok(outcome)
    }

    /// State of the current countdown, `None` before the first start
    pub fn engine_state(&self) -> Result<Option<EngineState>> {
        let slot = self.lock_slot()?;
        slot.controller.as_ref().map(CountdownController::state).transpose()
    }

    /// Dispose of the current countdown, e.g. on shutdown
    pub fn dispose(&self) -> Result<()> {
        let mut slot = self.lock_slot()?;
        if let Some(mut controller) = slot.controller.take() {
            controller.dispose();
            info!("Disposed countdown session {}", slot.session);
        }
        Ok(())
    }

    /// Fold an update into the published view
    pub fn apply_view_update(&self, update: &ViewUpdate) -> bool {
        let mut changed = false;
        self.view_tx.send_modify(|view| changed = view.apply(update));
        changed
    }

    /// Get the current view
    pub fn get_view(&self) -> CountdownView {
        self.view_tx.borrow().clone()
    }

    /// Subscribe to view changes
    pub fn subscribe_view(&self) -> watch::Receiver<CountdownView> {
        self.view_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Dispose the slot's countdown and start a new session with `config`
    fn start_in(&self, slot: &mut Slot, config: CountdownConfig) -> Result<CommandOutcome> {
        if let Some(mut previous) = slot.controller.take() {
            previous.dispose();
        }

        slot.session += 1;
        let session = slot.session;
        let duration_ms = config.duration_ms();
        let mut controller = CountdownController::new(config, SessionListener::new(session, self.update_tx.clone()));

        // Posted before arming so the first tick cannot overtake it
        self.post(ViewUpdate::Armed { session, duration_ms });
        if let Err(e) = controller.start() {
            self.post(ViewUpdate::Stopped {
                session,
                state: EngineState::Idle,
            });
            return Err(e);
        }

        let state = controller.state()?;
        slot.controller = Some(controller);
        info!("Started countdown session {}: {}ms", session, duration_ms);
        Ok(CommandOutcome {
            session,
            state,
            duration_ms,
        })
    }

    fn post(&self, update: ViewUpdate) {
        if let Err(e) = self.update_tx.send(update) {
            warn!("Failed to send view update: {:?}", e.0);
        }
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    fn lock_slot(&self) -> Result<MutexGuard<'_, Slot>> {
        self.slot
            .lock()
            .map_err(|e| CountdownError::StateUnavailable(format!("Failed to lock countdown slot: {}", e)))
    }
}
