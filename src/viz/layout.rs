use egui::{pos2, Pos2, Vec2};

use crate::tracker::{Hierarchy, NodeId};

/// Longest label drawn next to a node before it gets cut
pub const LABEL_MAX_CHARS: usize = 20;

#[derive(Debug, Clone, Copy)]
pub struct LayoutConfig {
    /// Horizontal distance between two depth levels
    pub column_spacing: f32,
    /// Vertical distance between two leaves
    pub row_spacing: f32,
    pub margin: Vec2,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            column_spacing: 180.0,
            row_spacing: 48.0,
            margin: Vec2::new(120.0, 20.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlacedNode {
    pub id: NodeId,
    pub label: String,
    pub tooltip: String,
    pub pos: Pos2,
    pub has_children: bool,
}

/// Positioned node-link diagram of one or more trees, growing left to right
#[derive(Debug, Clone, Default)]
pub struct TreeLayout {
    pub nodes: Vec<PlacedNode>,
    /// Parent and child indices into `nodes`
    pub edges: Vec<(usize, usize)>,
    pub size: Vec2,
}

impl TreeLayout {
    /// Node whose marker contains `pos`, the closest one if several overlap
    pub fn node_at(&self, pos: Pos2, radius: f32) -> Option<NodeId> {
        self.nodes
            .iter()
            .map(|n| (n, n.pos.distance(pos)))
            .filter(|(_, d)| *d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(n, _)| n.id)
    }

    pub fn position_of(&self, id: NodeId) -> Option<Pos2> {
        self.nodes.iter().find(|n| n.id == id).map(|n| n.pos)
    }
}

pub fn truncate_label(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    } else {
        text.to_string()
    }
}

/// Leaves take successive rows, a parent sits halfway between its first and
/// last child, and each root starts a new block one empty row below the previous.
pub fn layout(forest: &[Hierarchy<'_>], config: &LayoutConfig) -> TreeLayout {
    let mut out = TreeLayout::default();
    let mut next_row = 0.0_f32;
    let mut max_depth = 0usize;

    for (i, tree) in forest.iter().enumerate() {
        if i > 0 {
            next_row += 1.0;
        }
        place(tree, 0, &mut next_row, &mut max_depth, config, &mut out);
    }

    let rows = next_row.max(1.0);
    out.size = Vec2::new(
        config.margin.x * 2.0 + max_depth as f32 * config.column_spacing,
        config.margin.y * 2.0 + (rows - 1.0) * config.row_spacing,
    );
    out
}

fn place(
    tree: &Hierarchy<'_>,
    depth: usize,
    next_row: &mut f32,
    max_depth: &mut usize,
    config: &LayoutConfig,
    out: &mut TreeLayout,
) -> (usize, f32) {
    *max_depth = (*max_depth).max(depth);
    let index = out.nodes.len();
    out.nodes.push(PlacedNode {
        id: tree.node.id(),
        label: truncate_label(tree.node.title(), LABEL_MAX_CHARS),
        tooltip: format!("{}\n{}", tree.node.title(), tree.node.url()),
        pos: Pos2::ZERO,
        has_children: !tree.is_leaf(),
    });

    let mut child_rows = Vec::with_capacity(tree.children.len());
    for child in &tree.children {
        let (child_index, row) = place(child, depth + 1, next_row, max_depth, config, out);
        out.edges.push((index, child_index));
        child_rows.push(row);
    }

    let row = match (child_rows.first(), child_rows.last()) {
        (Some(first), Some(last)) => (first + last) / 2.0,
        _ => {
            let row = *next_row;
            *next_row += 1.0;
            row
        }
    };

    out.nodes[index].pos = pos2(
        config.margin.x + depth as f32 * config.column_spacing,
        config.margin.y + row * config.row_spacing,
    );
    (index, row)
}
