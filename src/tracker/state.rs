use log2::*;
use std::collections::HashMap;

use super::error::TrackerError;
use super::node::{Node, NodeId};
use crate::wiki;

/// Current state of a browsing session
#[derive(Debug, Default)]
pub struct TrackerState {
    /// Every node of the session keyed by id
    pub(super) nodes: HashMap<NodeId, Node>,
    /// Node ids in creation order, used for stable iteration
    order: Vec<NodeId>,
    /// Exact URL to node, nodes are unique per URL
    by_url: HashMap<String, NodeId>,
    /// Breadcrumb trail, last element is the node currently viewed
    current_path: Vec<NodeId>,
    /// Node shown in the details panel
    selected: Option<NodeId>,
}

impl TrackerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a visit to `url`, either as a new root (`parent_id == None`)
    /// or by descending from `parent_id`.
    ///
    /// Re-adding a URL that is already in the session bumps its visit count
    /// and keeps its original place in the tree.
    pub fn add_node(&mut self, url: &str, parent_id: Option<NodeId>) -> Result<&Node, TrackerError> {
        let article = wiki::parse_article(url).inspect_err(|e| warn!("Rejected add: {}", e))?;

        if let Some(&existing_id) = self.by_url.get(&article.url) {
            let Some(node) = self.nodes.get_mut(&existing_id) else {
                error!("Url index points at missing node {}", existing_id);
                return Err(TrackerError::NodeNotFound(existing_id));
            };
            node.record_visit();
            info!("Revisited {} (visit #{})", node.title(), node.visit_count());
            match parent_id {
                Some(_) => self.current_path.push(existing_id),
                None => self.current_path = vec![existing_id],
            }
            self.selected = Some(existing_id);
            return Ok(node);
        }

        let depth = match parent_id {
            Some(pid) => match self.nodes.get(&pid) {
                Some(parent) => parent.depth() + 1,
                None => {
                    error!("Parent {} of {} is not in the session", pid, url);
                    return Err(TrackerError::ParentNotFound(pid));
                }
            },
            None => 0,
        };

        let node = Node::new(article, parent_id, depth);
        let id = node.id();
        info!("Added {} at depth {}", node.title(), depth);

        if let Some(parent) = parent_id.and_then(|pid| self.nodes.get_mut(&pid)) {
            parent.push_child(id);
        }
        match parent_id {
            Some(_) => self.current_path.push(id),
            None => self.current_path = vec![id],
        }
        self.by_url.insert(node.url().to_string(), id);
        self.order.push(id);
        self.selected = Some(id);
        self.nodes.insert(id, node);

        Ok(&self.nodes[&id])
    }

    /// Step one entry back along the breadcrumb trail.
    /// Does nothing while the trail holds one node or fewer.
    pub fn go_back(&mut self) -> Option<&Node> {
        if self.current_path.len() <= 1 {
            return None;
        }

        self.current_path.pop();
        let previous = *self.current_path.last()?;
        let Some(node) = self.nodes.get(&previous) else {
            error!("Breadcrumb entry {} does not resolve to a node", previous);
            return None;
        };
        self.selected = Some(previous);
        debug!("Went back to {}", node.title());
        Some(node)
    }

    /// Cut the breadcrumb trail right after the first occurrence of `id`.
    /// Ids that are not on the trail are ignored.
    pub fn jump_to_breadcrumb(&mut self, id: NodeId) -> Option<&Node> {
        let index = self.current_path.iter().position(|&p| p == id)?;
        if !self.nodes.contains_key(&id) {
            error!("Breadcrumb entry {} does not resolve to a node", id);
            return None;
        }

        self.current_path.truncate(index + 1);
        self.selected = Some(id);
        let node = self.nodes.get(&id)?;
        debug!("Jumped to breadcrumb {} ({})", index, node.title());
        Some(node)
    }

    /// Forget the whole session
    pub fn clear(&mut self) {
        info!("Clearing {} nodes", self.nodes.len());
        self.nodes.clear();
        self.order.clear();
        self.by_url.clear();
        self.current_path.clear();
        self.selected = None;
    }

    /// Selection setter for node clicks. Unknown ids leave the selection as is.
    pub fn select(&mut self, id: NodeId) -> Option<&Node> {
        let node = self.nodes.get(&id)?;
        self.selected = Some(id);
        Some(node)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn node_by_url(&self, url: &str) -> Option<&Node> {
        self.by_url.get(url).and_then(|id| self.nodes.get(id))
    }

    /// All nodes in creation order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn roots(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes().filter(|n| n.is_root())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn current_path(&self) -> &[NodeId] {
        &self.current_path
    }

    /// Breadcrumb trail resolved to nodes, unresolvable ids are skipped
    pub fn current_path_nodes(&self) -> Vec<&Node> {
        self.current_path
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .collect()
    }

    pub fn current_node(&self) -> Option<&Node> {
        self.current_path.last().and_then(|id| self.nodes.get(id))
    }

    pub fn is_currently_viewing(&self, id: NodeId) -> bool {
        self.current_path.last() == Some(&id)
    }

    pub fn selected(&self) -> Option<&Node> {
        self.selected.and_then(|id| self.nodes.get(&id))
    }

    pub fn selected_id(&self) -> Option<NodeId> {
        self.selected
    }
}
