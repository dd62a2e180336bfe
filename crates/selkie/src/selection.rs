//! Selection reconciliation for default-owned collections.
//!
//! Both helpers are copy-on-write: they return a fresh collection and never mutate the
//! previous one, so consumers holding the old snapshot can rely on identity-based change
//! detection.

use crate::changes::SelectionChange;
use crate::internals::NodeInternals;
use crate::node::Edge;

/// Applies a selection change-set to a cloned node collection, flag-by-flag by id lookup.
/// Changes naming unknown ids are ignored.
pub fn apply_node_selection(
    internals: &NodeInternals,
    changes: &[SelectionChange],
) -> NodeInternals {
    let mut next = internals.clone();
    for change in changes {
        if let Some(node) = next.node_mut(&change.id) {
            node.selected = change.selected;
        }
    }
    next
}

/// Same reconciliation over the edge sequence.
pub fn apply_edge_selection(edges: &[Edge], changes: &[SelectionChange]) -> Vec<Edge> {
    let mut next = edges.to_vec();
    for change in changes {
        if let Some(edge) = next.iter_mut().find(|e| e.id == change.id) {
            edge.selected = change.selected;
        }
    }
    next
}
