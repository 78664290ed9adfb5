use chrono::{DateTime, Local};
use std::fmt;
use uuid::Uuid;

use crate::wiki::{self, Article};

/// Opaque identifier of a node, unique for the lifetime of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(Uuid);

impl NodeId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One visited article.
///
/// Everything except `children` and `visit_count` is fixed at creation.
/// Whether the node is the one currently being viewed is not stored here,
/// ask [`TrackerState::is_currently_viewing`](super::TrackerState::is_currently_viewing).
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    title: String,
    url: String,
    language: String,
    parent_id: Option<NodeId>,
    children: Vec<NodeId>,
    depth: usize,
    timestamp: DateTime<Local>,
    visit_count: u32,
}

impl Node {
    pub(super) fn new(article: Article, parent_id: Option<NodeId>, depth: usize) -> Self {
        Self {
            id: wiki::generate_id(),
            title: article.title,
            url: article.url,
            language: article.language,
            parent_id,
            children: Vec::new(),
            depth,
            timestamp: Local::now(),
            visit_count: 1,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn parent_id(&self) -> Option<NodeId> {
        self.parent_id
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub fn visit_count(&self) -> u32 {
        self.visit_count
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub(super) fn push_child(&mut self, child: NodeId) {
        self.children.push(child);
    }

    pub(super) fn record_visit(&mut self) {
        self.visit_count += 1;
    }
}
