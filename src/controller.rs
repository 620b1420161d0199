use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::github::constants::{DEFAULT_WAIT_TIMEOUT_MS, REPO_STATS_QUERY};
use crate::github::utils::repo::RepoIdentity;
use crate::github::utils::size::{HumanSize, format_size, kilobytes_to_bytes};
use crate::github::{FetchErrorKind, SizeSource};
use crate::page::{
    Indicator, NodeId, Page, WaitOutcome, in_code_view, is_private, remove_indicators, wait_for,
};
use crate::settings::{SettingsStore, read_auto_ask, read_token};

/// How a reconciliation pass ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    /// The location is not a repository page.
    NotRepository,
    /// The page has no stats row to render into.
    NoAnchor,
    /// A newer pass started; this one left the page alone.
    Superseded,
    /// Private repository and no token; `prompted` tells whether the token prompt was shown.
    MissingToken { prompted: bool },
    Failed(FetchErrorKind),
    Rendered(HumanSize),
}

/// Keeps the size indicator of the current page in sync with the API.
///
/// Every trigger runs [`Reconciler::reconcile`] as an independent pass. Each
/// pass draws an increasing id; only the latest issued pass may touch the
/// page, so a slow earlier pass cannot overwrite a newer result.
pub struct Reconciler<P, S, F> {
    page: P,
    settings: S,
    source: F,
    wait_timeout: Duration,
    latest_pass: AtomicU64,
}

impl<P, S, F> Reconciler<P, S, F>
where
    P: Page,
    S: SettingsStore,
    F: SizeSource,
{
    pub fn new(page: P, settings: S, source: F) -> Self {
        Self {
            page,
            settings,
            source,
            wait_timeout: Duration::from_millis(DEFAULT_WAIT_TIMEOUT_MS),
            latest_pass: AtomicU64::new(0),
        }
    }

    /// How long a pass waits for the stats row on a code view page.
    pub fn with_wait_timeout(mut self, wait_timeout: Duration) -> Self {
        self.wait_timeout = wait_timeout;
        self
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn settings(&self) -> &S {
        &self.settings
    }

    pub fn source(&self) -> &F {
        &self.source
    }

    fn is_current(&self, pass: u64) -> bool {
        self.latest_pass.load(Ordering::SeqCst) == pass
    }

    /// Run one pass: identity, anchor, token, fetch, render.
    pub async fn reconcile(&self) -> PassOutcome {
        let pass = self.latest_pass.fetch_add(1, Ordering::SeqCst) + 1;

        let pathname = self.page.pathname();
        let path = pathname.strip_prefix('/').unwrap_or(&pathname);
        let Some(repo) = RepoIdentity::from_path(path) else {
            log::debug!("reconcile pass={pass} skipped, not a repository path={pathname}");
            return PassOutcome::NotRepository;
        };

        let Some(anchor) = self.resolve_anchor().await else {
            log::debug!("reconcile pass={pass} repo={repo} no stats row");
            return PassOutcome::NoAnchor;
        };

        if !self.is_current(pass) {
            return PassOutcome::Superseded;
        }
        remove_indicators(&self.page);

        let token = match read_token(&self.settings).await {
            Ok(token) => token,
            Err(e) => {
                log::warn!("reading token failed, continuing without one: {e}");
                None
            }
        };

        if token.is_none() && is_private(&self.page) {
            let prompted = match read_auto_ask(&self.settings).await {
                Ok(auto_ask) => auto_ask,
                Err(e) => {
                    log::warn!("reading auto-ask preference failed: {e}");
                    true
                }
            };
            if !self.is_current(pass) {
                return PassOutcome::Superseded;
            }
            if prompted {
                self.page.ask_for_token();
            }
            self.render(pass, anchor, Indicator::MissingToken);
            log::info!("repo={repo} is private and no token is stored");
            return PassOutcome::MissingToken { prompted };
        }

        log::debug!(
            "reconcile pass={pass} repo={repo} authenticated={}",
            token.is_some()
        );
        let fetched = match &token {
            Some(token) => self.source.authenticated(&repo, token).await,
            None => self.source.anonymous(&repo).await,
        };

        match fetched {
            Ok(kilobytes) => {
                let size = format_size(kilobytes_to_bytes(kilobytes));
                if !self.render(pass, anchor, Indicator::Size(size.clone())) {
                    return PassOutcome::Superseded;
                }
                log::info!("repo={repo} size={size}");
                PassOutcome::Rendered(size)
            }
            Err(e) => {
                let kind = e.kind();
                if !self.render(pass, anchor, Indicator::Error(kind)) {
                    return PassOutcome::Superseded;
                }
                log::warn!("repo={repo} size fetch failed: {e}");
                PassOutcome::Failed(kind)
            }
        }
    }

    /// Find the stats row, giving a code view page one chance to render it.
    async fn resolve_anchor(&self) -> Option<NodeId> {
        if let Some(anchor) = self.page.query_selector(REPO_STATS_QUERY) {
            return Some(anchor);
        }
        if !in_code_view(&self.page) {
            return None;
        }
        match wait_for(&self.page, REPO_STATS_QUERY, self.wait_timeout).await {
            WaitOutcome::Found(anchor) => Some(anchor),
            WaitOutcome::TimedOut => None,
        }
    }

    /// Replace whatever indicator is present. Returns false for a stale pass.
    fn render(&self, pass: u64, anchor: NodeId, indicator: Indicator) -> bool {
        if !self.is_current(pass) {
            log::debug!("reconcile pass={pass} superseded, dropping {indicator:?}");
            return false;
        }
        remove_indicators(&self.page);
        self.page.render_indicator(anchor, &indicator);
        true
    }
}
