//! Drift-free remaining-time computation
//!
//! The engine never reads a clock. It is handed the *scheduled* time of each
//! fire and anchors the whole run to the scheduled time of the first fire, so
//! a late or early fire only affects its own reading and never shifts the
//! readings after it.

use tracing::debug;

/// What a single fire produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fire {
    /// Countdown still running, with this many milliseconds left
    Tick(u64),
    /// Countdown reached zero; the run is over
    Finished,
}

/// Per-run countdown math.
#[derive(Debug, Clone)]
pub struct CountdownEngine {
    duration_ms: u64,
    /// Scheduled time of the run's first fire, `None` until it happens
    reference_ms: Option<u64>,
    restart_requested: bool,
    /// Last value handed to `on_tick` in this run
    last_remaining_ms: Option<u64>,
    finished: bool,
}

impl CountdownEngine {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            reference_ms: None,
            restart_requested: false,
            last_remaining_ms: None,
            finished: false,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn reference_ms(&self) -> Option<u64> {
        self.reference_ms
    }

    /// Last remaining time reported in the current run
    pub fn remaining_ms(&self) -> Option<u64> {
        self.last_remaining_ms
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn restart_requested(&self) -> bool {
        self.restart_requested
    }

    /// Forget everything about the current run. The next fire is a first fire.
    pub fn reset(&mut self) {
        self.reference_ms = None;
        self.restart_requested = false;
        self.last_remaining_ms = None;
        self.finished = false;
    }

    /// Treat the next fire of the still-armed schedule as a first fire.
    pub fn request_restart(&mut self) {
        self.restart_requested = true;
        self.finished = false;
    }

    /// Process one fire scheduled at `scheduled_ms`.
    ///
    /// Returns `None` when the fire must not produce a callback: the run has
    /// already finished, or the fire is a duplicate that would not move the
    /// countdown forward.
    pub fn on_fire(&mut self, scheduled_ms: u64) -> Option<Fire> {
        if self.restart_requested {
            self.reference_ms = None;
            self.last_remaining_ms = None;
            self.restart_requested = false;
        } else if self.finished {
            return None;
        }

        let Some(reference_ms) = self.reference_ms else {
            self.reference_ms = Some(scheduled_ms);
            debug!("First fire at {}ms, counting down {}ms", scheduled_ms, self.duration_ms);
            if self.duration_ms == 0 {
                return Some(self.finish());
            }
            self.last_remaining_ms = Some(self.duration_ms);
            return Some(Fire::Tick(self.duration_ms));
        };

        let elapsed = scheduled_ms.saturating_sub(reference_ms);
        if elapsed >= self.duration_ms {
            return Some(self.finish());
        }

        let remaining = self.duration_ms - elapsed;
        if self.last_remaining_ms.is_some_and(|last| remaining >= last) {
            debug!("Ignoring fire at {}ms: remaining {}ms does not advance", scheduled_ms, remaining);
            return None;
        }
        self.last_remaining_ms = Some(remaining);
        Some(Fire::Tick(remaining))
    }

    fn finish(&mut self) -> Fire {
        self.reference_ms = None;
        self.last_remaining_ms = None;
        self.finished = true;
        Fire::Finished
    }
}
