//! View updater background task

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::state::{AppState, ViewUpdate};

/// Background task that folds countdown and lifecycle updates into the view,
/// in the order they were posted
pub async fn view_updater_task(state: Arc<AppState>, mut updates: mpsc::UnboundedReceiver<ViewUpdate>) {
    info!("Starting view updater task");

    while let Some(update) = updates.recv().await {
        if state.apply_view_update(&update) {
            let view = state.get_view();
            debug!(
                "View updated: session={}, state={}, time={}, progress={:.3}",
                view.session, view.state, view.time, view.progress
            );
        } else {
            debug!("Ignoring stale view update: {:?}", update);
        }
    }

    info!("View update channel closed, stopping view updater");
}
