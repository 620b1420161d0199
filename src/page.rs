use tokio::sync::broadcast;

use crate::github::FetchErrorKind;
use crate::github::constants::{
    CODE_TAB_QUERY, MISSING_TOKEN_TEXT, PRIVATE_LABEL_QUERY, PRIVATE_LABEL_TEXT, REPO_SIZE_ID,
    UNAUTHORIZED_TEXT, UNKNOWN_ERROR_TEXT,
};
use crate::github::utils::size::HumanSize;

mod memory;
pub mod waiter;
pub mod watcher;

pub use self::memory::MemoryPage;
pub use self::waiter::{WaitOutcome, wait_for};
pub use self::watcher::NavigationWatcher;

/// Opaque handle to a node of the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Notifications from the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    /// The document tree or an attribute changed.
    Mutation,
    /// The host finished a (partial) page load.
    Ready,
}

/// Widget rendered into the stats row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Indicator {
    Size(HumanSize),
    Error(FetchErrorKind),
    MissingToken,
}

impl Indicator {
    pub fn text(&self) -> String {
        match self {
            Indicator::Size(size) => size.to_string(),
            Indicator::Error(FetchErrorKind::Unauthorized) => UNAUTHORIZED_TEXT.to_string(),
            Indicator::Error(FetchErrorKind::Unknown) => UNKNOWN_ERROR_TEXT.to_string(),
            Indicator::MissingToken => MISSING_TOKEN_TEXT.to_string(),
        }
    }
}

/// The document contract the reconciler works against.
///
/// Building the actual widgets is the host's business; the reconciler only
/// decides which [`Indicator`] goes where.
pub trait Page {
    /// Full location, compared across mutations to detect navigation.
    fn href(&self) -> String;

    /// Location path including the leading slash.
    fn pathname(&self) -> String;

    fn query_selector(&self, selector: &str) -> Option<NodeId>;

    fn element_by_id(&self, id: &str) -> Option<NodeId>;

    fn text_content(&self, node: NodeId) -> Option<String>;

    /// Detach a node and its subtree. Unknown nodes are ignored.
    fn remove(&self, node: NodeId);

    /// Append the indicator to `anchor`, wrapped in an element with id
    /// [`REPO_SIZE_ID`], and return the wrapper.
    fn render_indicator(&self, anchor: NodeId, indicator: &Indicator) -> NodeId;

    /// Show the token request prompt.
    fn ask_for_token(&self);

    fn events(&self) -> broadcast::Receiver<PageEvent>;
}

/// Whether the repository header carries the "Private" label.
pub fn is_private<P: Page>(page: &P) -> bool {
    page.query_selector(PRIVATE_LABEL_QUERY)
        .and_then(|label| page.text_content(label))
        .is_some_and(|text| text == PRIVATE_LABEL_TEXT)
}

/// Whether the code tab is the selected repository tab.
pub fn in_code_view<P: Page>(page: &P) -> bool {
    page.query_selector(CODE_TAB_QUERY).is_some()
}

/// Remove every size indicator currently in the page; returns how many were removed.
pub fn remove_indicators<P: Page>(page: &P) -> usize {
    let mut removed = 0;
    while let Some(node) = page.element_by_id(REPO_SIZE_ID) {
        page.remove(node);
        removed += 1;
    }
    removed
}
