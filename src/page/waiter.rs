// Waiting for late-rendered nodes
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{Instant, timeout_at};

use super::{NodeId, Page};

/// Result of waiting for a selector to appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Found(NodeId),
    TimedOut,
}

/// Wait until `selector` matches a node or `timeout` elapses.
///
/// Returns at once when the node is already present. Otherwise every page
/// event triggers a re-check. The event subscription is dropped on return.
pub async fn wait_for<P: Page>(page: &P, selector: &str, timeout: Duration) -> WaitOutcome {
    // Subscribe before the first check so a node added in between is not missed
    let mut events = page.events();
    if let Some(node) = page.query_selector(selector) {
        return WaitOutcome::Found(node);
    }

    let deadline = Instant::now() + timeout;
    loop {
        match timeout_at(deadline, events.recv()).await {
            Err(_) => {
                log::debug!("wait_for selector={selector} timed out after {timeout:?}");
                return WaitOutcome::TimedOut;
            }
            Ok(Err(RecvError::Closed)) => {
                log::debug!("wait_for selector={selector} page events closed");
                return WaitOutcome::TimedOut;
            }
            Ok(Ok(_)) | Ok(Err(RecvError::Lagged(_))) => {
                if let Some(node) = page.query_selector(selector) {
                    return WaitOutcome::Found(node);
                }
            }
        }
    }
}
