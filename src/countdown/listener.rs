//! Callback contract between the countdown and whoever renders it

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::warn;

/// Receives the output of a countdown run.
///
/// Called from the ticker task while the instance state is locked, so
/// implementations must return quickly and must not call back into the
/// controller. Hand the value off (e.g. over a channel) instead.
pub trait CountdownListener: Send + Sync + 'static {
    /// Time left in the current run. Always greater than zero.
    fn on_tick(&self, remaining_ms: u64);

    /// The run reached zero. Last callback of the run.
    fn on_finished(&self);
}

/// Message form of the callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CountdownEvent {
    Tick { remaining_ms: u64 },
    Finished,
}

/// Posts every callback as a [`CountdownEvent`] on an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelListener {
    tx: mpsc::UnboundedSender<CountdownEvent>,
}

impl ChannelListener {
    pub fn new(tx: mpsc::UnboundedSender<CountdownEvent>) -> Self {
        Self { tx }
    }

    fn post(&self, event: CountdownEvent) {
        if let Err(e) = self.tx.send(event) {
            warn!("Dropping countdown event, receiver is gone: {:?}", e.0);
        }
    }
}

impl CountdownListener for ChannelListener {
    fn on_tick(&self, remaining_ms: u64) {
        self.post(CountdownEvent::Tick { remaining_ms });
    }

    fn on_finished(&self) {
        self.post(CountdownEvent::Finished);
    }
}

/// Create a channel listener together with the receiving end of its events.
pub fn channel() -> (ChannelListener, mpsc::UnboundedReceiver<CountdownEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelListener::new(tx), rx)
}

/// Listener built from a pair of closures.
pub struct FnListener<T, F> {
    on_tick: T,
    on_finished: F,
}

impl<T, F> FnListener<T, F>
where
    T: Fn(u64) + Send + Sync + 'static,
    F: Fn() + Send + Sync + 'static,
{
    pub fn new(on_tick: T, on_finished: F) -> Self {
        Self { on_tick, on_finished }
    }
}

impl<T, F> CountdownListener for FnListener<T, F>
where
    T: Fn(u64) + Send + Sync + 'static,
    F: Fn() + Send + Sync + 'static,
{
    fn on_tick(&self, remaining_ms: u64) {
        (self.on_tick)(remaining_ms)
    }

    fn on_finished(&self) {
        (self.on_finished)()
    }
}
