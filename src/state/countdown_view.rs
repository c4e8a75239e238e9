//! Renderable projection of the countdown event stream

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::warn;

use crate::{
    countdown::{CountdownEvent, CountdownListener, EngineState},
    utils::{format_remaining, progress},
};

/// Remaining time at or below which the countdown enters its final stretch
pub const LAST_TEN_SECONDS_MS: u64 = 10_000;

/// Everything a presentation layer needs to draw the countdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountdownView {
    /// Controller instance the view currently follows
    pub session: u64,
    pub state: EngineState,
    pub duration_ms: u64,
    pub remaining_ms: u64,
    /// Remaining time as `mm:ss`
    pub time: String,
    /// Fraction of the countdown left, 1.0 at start
    pub progress: f32,
    pub last_ten_seconds: bool,
}

/// One change to the view, in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewUpdate {
    /// A run is about to begin with the full duration
    Armed { session: u64, duration_ms: u64 },
    /// The countdown stopped without finishing, or failed to arm
    Stopped { session: u64, state: EngineState },
    /// Output of the countdown itself
    Countdown { session: u64, event: CountdownEvent },
}

impl ViewUpdate {
    pub fn session(&self) -> u64 {
        match self {
            ViewUpdate::Armed { session, .. }
            | ViewUpdate::Stopped { session, .. }
            | ViewUpdate::Countdown { session, .. } => *session,
        }
    }
}

impl CountdownView {
    /// Create an idle view showing zero
    pub fn new() -> Self {
        Self {
            session: 0,
            state: EngineState::Idle,
            duration_ms: 0,
            remaining_ms: 0,
            time: format_remaining(0),
            progress: 0.0,
            last_ten_seconds: false,
        }
    }

    /// Apply an update. Updates from an older session are ignored.
    ///
    /// Returns whether the view changed.
    pub fn apply(&mut self, update: &ViewUpdate) -> bool {
        if update.session() < self.session {
            return false;
        }

        match *update {
            ViewUpdate::Armed { session, duration_ms } => {
                self.session = session;
                self.state = EngineState::Running;
                self.duration_ms = duration_ms;
                self.set_remaining(duration_ms);
            }
            ViewUpdate::Stopped { session, state } => {
                self.session = session;
                self.state = state;
                if !state.is_running() {
                    self.set_remaining(0);
                }
            }
            ViewUpdate::Countdown { session, event } => {
                if session != self.session || !self.state.is_running() {
                    return false;
                }
                match event {
                    CountdownEvent::Tick { remaining_ms } => self.set_remaining(remaining_ms),
                    CountdownEvent::Finished => {
                        self.state = EngineState::Finished;
                        self.set_remaining(0);
                    }
                }
            }
        }
        true
    }

    fn set_remaining(&mut self, remaining_ms: u64) {
        self.remaining_ms = remaining_ms;
        self.time = format_remaining(remaining_ms);
        self.progress = progress(remaining_ms, self.duration_ms);
        self.last_ten_seconds = self.state.is_running() && remaining_ms <= LAST_TEN_SECONDS_MS;
    }
}

impl Default for CountdownView {
    fn default() -> Self {
        Self::new()
    }
}

/// Forwards a controller's callbacks as [`ViewUpdate`]s tagged with its session
#[derive(Debug, Clone)]
pub struct SessionListener {
    session: u64,
    tx: mpsc::UnboundedSender<ViewUpdate>,
}

impl SessionListener {
    pub fn new(session: u64, tx: mpsc::UnboundedSender<ViewUpdate>) -> Self {
        Self { session, tx }
    }

    fn post(&self, event: CountdownEvent) {
        let update = ViewUpdate::Countdown {
            session: self.session,
            event,
        };
        if let Err(e) = self.tx.send(update) {
            warn!("Failed to post countdown event for session {}: {:?}", self.session, e.0);
        }
    }
}

impl CountdownListener for SessionListener {
    fn on_tick(&self, remaining_ms: u64) {
        self.post(CountdownEvent::Tick { remaining_ms });
    }

    fn on_finished(&self) {
        self.post(CountdownEvent::Finished);
    }
}
