//! Change-set records handed to the external change callbacks, plus helpers to apply them to
//! caller-owned collections.
//!
//! The core emits these for every selection, position and dimension update regardless of
//! whether the collection is internally ("default") or externally ("controlled") owned.

use serde::{Deserialize, Serialize};

use crate::geom::{Point, Size};
use crate::node::{Edge, Node};

/// A single node selection toggle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionChange {
    pub id: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeChange {
    Select {
        id: String,
        selected: bool,
    },
    Position {
        id: String,
        position: Point,
        position_absolute: Point,
        dragging: bool,
    },
    Dimensions {
        id: String,
        size: Size,
    },
    Remove {
        id: String,
    },
}

impl NodeChange {
    pub fn id(&self) -> &str {
        match self {
            NodeChange::Select { id, .. }
            | NodeChange::Position { id, .. }
            | NodeChange::Dimensions { id, .. }
            | NodeChange::Remove { id } => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EdgeChange {
    Select { id: String, selected: bool },
    Remove { id: String },
}

impl EdgeChange {
    pub fn id(&self) -> &str {
        match self {
            EdgeChange::Select { id, .. } | EdgeChange::Remove { id } => id,
        }
    }
}

/// Applies a change-set to a caller-owned node list, returning the new list. Intended for
/// controlled-mode callers that mirror the core's default behavior.
pub fn apply_node_changes(changes: &[NodeChange], nodes: Vec<Node>) -> Vec<Node> {
    let mut next: Vec<Node> = Vec::with_capacity(nodes.len());

    for mut node in nodes {
        let mut removed = false;
        for change in changes.iter().filter(|c| c.id() == node.id) {
            match change {
                NodeChange::Select { selected, .. } => node.selected = *selected,
                NodeChange::Position { position, .. } => node.position = *position,
                NodeChange::Dimensions { size, .. } => {
                    node.width = Some(size.width);
                    node.height = Some(size.height);
                }
                NodeChange::Remove { .. } => removed = true,
            }
        }
        if !removed {
            next.push(node);
        }
    }

    next
}

pub fn apply_edge_changes(changes: &[EdgeChange], edges: Vec<Edge>) -> Vec<Edge> {
    let mut next: Vec<Edge> = Vec::with_capacity(edges.len());

    for mut edge in edges {
        let mut removed = false;
        for change in changes.iter().filter(|c| c.id() == edge.id) {
            match change {
                EdgeChange::Select { selected, .. } => edge.selected = *selected,
                EdgeChange::Remove { .. } => removed = true,
            }
        }
        if !removed {
            next.push(edge);
        }
    }

    next
}

/// Builds the selection change-set that moves `items` to exactly `selected_ids`: items in the
/// set that are not yet selected get a `selected: true` change, selected items outside the
/// set get `selected: false`.
pub fn selection_changes<'a>(
    items: impl Iterator<Item = (&'a str, bool)>,
    selected_ids: &rustc_hash::FxHashSet<String>,
) -> Vec<SelectionChange> {
    let mut changes = Vec::new();
    for (id, selected) in items {
        let will_select = selected_ids.contains(id);
        if will_select != selected {
            changes.push(SelectionChange {
                id: id.to_string(),
                selected: will_select,
            });
        }
    }
    changes
}
