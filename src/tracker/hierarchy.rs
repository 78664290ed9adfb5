use petgraph::dot::{Config, Dot};
use petgraph::graph::{Graph, NodeIndex};
use std::collections::HashMap;

use super::node::{Node, NodeId};
use super::state::TrackerState;

/// Rooted tree view over the flat node collection, rebuilt on demand for rendering
#[derive(Debug, Clone)]
pub struct Hierarchy<'a> {
    pub node: &'a Node,
    pub children: Vec<Hierarchy<'a>>,
}

impl<'a> Hierarchy<'a> {
    fn build(state: &'a TrackerState, node: &'a Node) -> Self {
        let children = node
            .children()
            .iter()
            .filter_map(|id| state.node(*id))
            .map(|child| Self::build(state, child))
            .collect();
        Self { node, children }
    }

    /// Number of nodes in this subtree, itself included
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(Hierarchy::size).sum::<usize>()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Indented text rendering, one line per node
    pub fn render_lines(&self) -> Vec<String> {
        let mut lines = vec![label(self.node)];
        render_children(&self.children, "", &mut lines);
        lines
    }
}

fn label(node: &Node) -> String {
    if node.visit_count() > 1 {
        format!("{} (x{})", node.title(), node.visit_count())
    } else {
        node.title().to_string()
    }
}

fn render_children(children: &[Hierarchy<'_>], prefix: &str, lines: &mut Vec<String>) {
    for (i, child) in children.iter().enumerate() {
        let last = i == children.len() - 1;
        let (branch, indent) = if last { ("└── ", "    ") } else { ("├── ", "│   ") };
        lines.push(format!("{}{}{}", prefix, branch, label(child.node)));
        render_children(&child.children, &format!("{}{}", prefix, indent), lines);
    }
}

impl TrackerState {
    /// Tree rooted at the single parentless node.
    /// `None` when the session is empty or holds more than one root.
    pub fn hierarchy(&self) -> Option<Hierarchy<'_>> {
        let mut roots = self.roots();
        let root = roots.next()?;
        if roots.next().is_some() {
            return None;
        }
        Some(Hierarchy::build(self, root))
    }

    /// One tree per root, in creation order
    pub fn forest(&self) -> Vec<Hierarchy<'_>> {
        self.roots().map(|root| Hierarchy::build(self, root)).collect()
    }

    /// Parent to child graph of the session, weighted by article title
    pub fn to_graph(&self) -> Graph<String, ()> {
        let mut graph = Graph::new();
        let mut indices: HashMap<NodeId, NodeIndex> = HashMap::new();

        for node in self.nodes() {
            indices.insert(node.id(), graph.add_node(node.title().to_string()));
        }
        for node in self.nodes() {
            if let (Some(parent), Some(child)) = (
                node.parent_id().and_then(|p| indices.get(&p)),
                indices.get(&node.id()),
            ) {
                graph.add_edge(*parent, *child, ());
            }
        }
        graph
    }

    /// Graphviz rendering of [`TrackerState::to_graph`]
    pub fn to_dot(&self) -> String {
        // Edge labels are suppressed; `&str` weights only satisfy petgraph's Display bound
        let graph = self.to_graph().map(|_, title| title.clone(), |_, _| "");
        format!("{}", Dot::with_config(&graph, &[Config::EdgeNoLabel]))
    }
}
