use futures::StreamExt;
use futures::stream::FuturesUnordered;
use std::future::Future;
use tokio::sync::broadcast::error::RecvError;

use super::{Page, PageEvent};
use crate::controller::Reconciler;
use crate::github::SizeSource;
use crate::github::constants::TOKEN_KEY;
use crate::settings::SettingsStore;

/// Turns page and storage notifications into reconciliation passes.
///
/// Single-page-app navigation does not reload the document, so the watcher
/// compares the location on every mutation and starts a pass when it moved.
#[derive(Debug, Default)]
pub struct NavigationWatcher {
    last_href: Option<String>,
}

impl NavigationWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A watcher that treats `href` as already handled.
    pub fn starting_at(href: impl Into<String>) -> Self {
        Self {
            last_href: Some(href.into()),
        }
    }

    /// Record `href`; returns true when it differs from the last one seen.
    pub fn observe(&mut self, href: &str) -> bool {
        if self.last_href.as_deref() == Some(href) {
            return false;
        }
        self.last_href = Some(href.to_string());
        true
    }

    /// Drive passes until `shutdown` resolves or the page stops emitting events.
    ///
    /// Passes run concurrently on the current task; the reconciler decides
    /// which one gets to render. In-flight passes are awaited before returning.
    pub async fn run<P, S, F>(
        mut self,
        reconciler: &Reconciler<P, S, F>,
        shutdown: impl Future<Output = ()>,
    ) where
        P: Page,
        S: SettingsStore,
        F: SizeSource,
    {
        let mut page_events = reconciler.page().events();
        let mut storage_changes = reconciler.settings().changes();
        let mut storage_open = true;
        let mut passes = FuturesUnordered::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                event = page_events.recv() => match event {
                    Ok(PageEvent::Ready) => {
                        log::debug!("page ready, starting pass");
                        passes.push(reconciler.reconcile());
                    }
                    Ok(PageEvent::Mutation) | Err(RecvError::Lagged(_)) => {
                        let href = reconciler.page().href();
                        if self.observe(&href) {
                            log::debug!("location changed to {href}, starting pass");
                            passes.push(reconciler.reconcile());
                        }
                    }
                    Err(RecvError::Closed) => break,
                },
                change = storage_changes.recv(), if storage_open => match change {
                    Ok(change) if change.key == TOKEN_KEY => {
                        log::debug!("token changed, starting pass");
                        passes.push(reconciler.reconcile());
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        log::debug!("missed {skipped} storage changes, starting pass");
                        passes.push(reconciler.reconcile());
                    }
                    Err(RecvError::Closed) => storage_open = false,
                },
                Some(outcome) = passes.next() => {
                    log::debug!("pass finished: {outcome:?}");
                }
            }
        }

        while let Some(outcome) = passes.next().await {
            log::debug!("pass finished: {outcome:?}");
        }
    }
}
