use std::collections::BTreeMap;
use std::sync::Mutex;
use tokio::sync::broadcast;
use url::Url;

use super::{Indicator, NodeId, Page, PageEvent};
use crate::github::constants::{
    CODE_TAB_QUERY, GITHUB_WEB_URL, MODAL_ID, REPO_SIZE_ID, REPO_STATS_QUERY, TOKEN_INPUT_ID,
};

const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
struct Node {
    selector: Option<String>,
    id: Option<String>,
    text: String,
    parent: Option<NodeId>,
    indicator: Option<Indicator>,
}

#[derive(Debug)]
struct Document {
    href: String,
    next_id: u64,
    nodes: BTreeMap<NodeId, Node>,
    prompts: usize,
}

impl Document {
    fn insert(&mut self, node: Node) -> NodeId {
        self.next_id += 1;
        let id = NodeId(self.next_id);
        self.nodes.insert(id, node);
        id
    }

    fn remove_subtree(&mut self, root: NodeId) -> bool {
        if self.nodes.remove(&root).is_none() {
            return false;
        }
        let children: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.parent == Some(root))
            .map(|(id, _)| *id)
            .collect();
        for child in children {
            self.remove_subtree(child);
        }
        true
    }
}

/// A document held in memory.
///
/// Nodes are registered under the selector they should answer to rather than
/// matched by a CSS engine. Used by the headless CLI and by tests.
pub struct MemoryPage {
    document: Mutex<Document>,
    events: broadcast::Sender<PageEvent>,
}

impl MemoryPage {
    pub fn new(href: impl Into<String>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            document: Mutex::new(Document {
                href: href.into(),
                next_id: 0,
                nodes: BTreeMap::new(),
                prompts: 0,
            }),
            events,
        }
    }

    /// A repository page with its stats row already rendered.
    pub fn repository(href: impl Into<String>) -> Self {
        let page = Self::new(href);
        page.add_node(REPO_STATS_QUERY, "");
        page
    }

    fn document(&self) -> std::sync::MutexGuard<'_, Document> {
        self.document.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn emit(&self, event: PageEvent) {
        let _ = self.events.send(event);
    }

    /// Add a top-level node answering to `selector`.
    pub fn add_node(&self, selector: &str, text: &str) -> NodeId {
        let id = self.document().insert(Node {
            selector: Some(selector.to_string()),
            id: None,
            text: text.to_string(),
            parent: None,
            indicator: None,
        });
        self.emit(PageEvent::Mutation);
        id
    }

    /// Render the stats row late, as a host page finishing its load would.
    pub fn add_stats_row(&self) -> NodeId {
        self.add_node(REPO_STATS_QUERY, "")
    }

    pub fn stats_row(&self) -> Option<NodeId> {
        self.query_selector(REPO_STATS_QUERY)
    }

    pub fn select_code_tab(&self) -> NodeId {
        self.add_node(CODE_TAB_QUERY, "Code")
    }

    /// Change location without reloading, like a single-page-app navigation.
    pub fn navigate(&self, href: impl Into<String>) {
        self.document().href = href.into();
        self.emit(PageEvent::Mutation);
    }

    /// Fire the host's page-ready event.
    pub fn fire_ready(&self) {
        self.emit(PageEvent::Ready);
    }

    /// Rendered indicators in document order, with their parent node.
    pub fn indicators(&self) -> Vec<(NodeId, Indicator)> {
        self.document()
            .nodes
            .values()
            .filter_map(|node| Some((node.parent?, node.indicator.clone()?)))
            .collect()
    }

    /// Text of the single rendered indicator, if any.
    pub fn indicator_text(&self) -> Option<String> {
        self.indicators()
            .first()
            .map(|(_, indicator)| indicator.text())
    }

    /// Number of times the token prompt was requested.
    pub fn prompt_count(&self) -> usize {
        self.document().prompts
    }
}

impl Page for MemoryPage {
    fn href(&self) -> String {
        self.document().href.clone()
    }

    fn pathname(&self) -> String {
        let href = self.href();
        Url::parse(&href)
            .or_else(|_| Url::parse(GITHUB_WEB_URL).and_then(|base| base.join(&href)))
            .map(|url| url.path().to_string())
            .unwrap_or_else(|_| "/".to_string())
    }

    fn query_selector(&self, selector: &str) -> Option<NodeId> {
        self.document()
            .nodes
            .iter()
            .find(|(_, node)| node.selector.as_deref() == Some(selector))
            .map(|(id, _)| *id)
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.document()
            .nodes
            .iter()
            .find(|(_, node)| node.id.as_deref() == Some(id))
            .map(|(node_id, _)| *node_id)
    }

    fn text_content(&self, node: NodeId) -> Option<String> {
        self.document().nodes.get(&node).map(|n| n.text.clone())
    }

    fn remove(&self, node: NodeId) {
        let removed = self.document().remove_subtree(node);
        if removed {
            self.emit(PageEvent::Mutation);
        }
    }

    fn render_indicator(&self, anchor: NodeId, indicator: &Indicator) -> NodeId {
        let id = self.document().insert(Node {
            selector: None,
            id: Some(REPO_SIZE_ID.to_string()),
            text: indicator.text(),
            parent: Some(anchor),
            indicator: Some(indicator.clone()),
        });
        self.emit(PageEvent::Mutation);
        id
    }

    fn ask_for_token(&self) {
        {
            let mut document = self.document();
            document.prompts += 1;
            let shown = document
                .nodes
                .values()
                .any(|node| node.id.as_deref() == Some(MODAL_ID));
            if !shown {
                let modal = document.insert(Node {
                    selector: None,
                    id: Some(MODAL_ID.to_string()),
                    text: String::new(),
                    parent: None,
                    indicator: None,
                });
                document.insert(Node {
                    selector: None,
                    id: Some(TOKEN_INPUT_ID.to_string()),
                    text: String::new(),
                    parent: Some(modal),
                    indicator: None,
                });
            }
        }
        self.emit(PageEvent::Mutation);
    }

    fn events(&self) -> broadcast::Receiver<PageEvent> {
        self.events.subscribe()
    }
}
