//! Layered layout of a [`FileNode`] forest.
//!
//! Every node sits in the column of its depth. Within a column nodes are
//! stacked in global depth-first visitation order, so children of different
//! parents at the same depth interleave rather than group.

use crate::model::{FileNode, GraphEdge, GraphLayout, GraphNode, Position};

/// Horizontal distance between depth columns.
pub const LEVEL_SPACING: f64 = 250.0;
/// Vertical distance between nodes in the same column.
pub const NODE_SPACING: f64 = 100.0;

/// Computes positioned nodes and parent→child edges for a forest.
#[must_use]
pub fn layout(roots: &[FileNode]) -> GraphLayout {
    let mut builder = LayoutBuilder::default();
    for root in roots {
        builder.visit(root, None, 0);
    }
    builder.layout
}

#[derive(Default)]
struct LayoutBuilder {
    layout: GraphLayout,
    /// Nodes placed so far in each column.
    placed_per_level: Vec<usize>,
}

impl LayoutBuilder {
    fn visit(&mut self, node: &FileNode, parent: Option<&str>, level: usize) {
        let index = self.claim_slot(level);
        self.layout.nodes.push(GraphNode {
            id: node.id.clone(),
            label: node.name.clone(),
            path: node.path.clone(),
            kind: node.kind,
            level,
            position: position(level, index),
        });

        if let Some(parent) = parent {
            self.layout.edges.push(GraphEdge {
                id: format!("edge-{parent}-{}", node.id),
                source: parent.to_string(),
                target: node.id.clone(),
            });
        }

        for child in &node.children {
            self.visit(child, Some(&node.id), level + 1);
        }
    }

    fn claim_slot(&mut self, level: usize) -> usize {
        if self.placed_per_level.len() <= level {
            self.placed_per_level.resize(level + 1, 0);
        }
        let index = self.placed_per_level[level];
        self.placed_per_level[level] += 1;
        index
    }
}

#[allow(clippy::cast_precision_loss)]
fn position(level: usize, index: usize) -> Position {
    Position { x: level as f64 * LEVEL_SPACING, y: index as f64 * NODE_SPACING }
}
