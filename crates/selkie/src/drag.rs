//! Drag resolution: which nodes take part in a gesture, and where a pointer movement is
//! allowed to put them.
//!
//! Every function here is a pure computation over an internals snapshot; the per-frame
//! write-back lives in [`crate::state::FlowState`].

use rustc_hash::FxHashSet;

use crate::error::{ErrorChannel, ErrorCode};
use crate::geom::{CoordinateExtent, Point, Vector, is_numeric, point, size, vector};
use crate::internals::NodeInternals;
use crate::node::{Node, NodeExtent, NodeOrigin};

/// Ephemeral per-gesture state for one dragged node. Created at gesture start, updated every
/// pointer-move frame, discarded at gesture end.
#[derive(Debug, Clone, PartialEq)]
pub struct DragItem {
    pub id: String,
    /// Parent-relative position, kept in sync with the node during the gesture.
    pub position: Point,
    pub position_absolute: Point,
    /// Pointer-to-node offset captured at gesture start.
    pub distance: Vector,
    /// Movement applied in the most recent frame.
    pub delta: Vector,
    pub extent: Option<NodeExtent>,
    pub parent: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// Walks the parent chain looking for a selected ancestor. The chain is acyclic by rebuild
/// invariant; the visited guard turns a corrupted chain into a clean `false` instead of a
/// hang.
pub fn is_ancestor_selected(node: &Node, internals: &NodeInternals) -> bool {
    let mut visited: FxHashSet<&str> = FxHashSet::default();
    visited.insert(node.id.as_str());

    let mut current = node.parent.as_deref();
    while let Some(parent_id) = current {
        if !visited.insert(parent_id) {
            return false;
        }
        let Some(parent) = internals.node(parent_id) else {
            return false;
        };
        if parent.selected {
            return true;
        }
        current = parent.parent.as_deref();
    }

    false
}

/// Collects the nodes participating in a drag gesture started at `pointer`.
///
/// A node qualifies if it is selected or is the explicitly dragged node, its nearest selected
/// ancestor does not already move it as a unit, and it is draggable (per-node override, else
/// the global default).
pub fn drag_items(
    internals: &NodeInternals,
    nodes_draggable: bool,
    pointer: Point,
    node_id: Option<&str>,
) -> Vec<DragItem> {
    internals
        .iter()
        .filter(|(n, _)| {
            (n.selected || node_id == Some(n.id.as_str()))
                && (n.parent.is_none() || !is_ancestor_selected(n, internals))
                && n.draggable.unwrap_or(nodes_draggable)
        })
        .map(|(n, d)| DragItem {
            id: n.id.clone(),
            position: n.position,
            position_absolute: d.position_absolute,
            distance: pointer - d.position_absolute,
            delta: vector(0.0, 0.0),
            extent: n.extent,
            parent: n.parent.clone(),
            width: n.width,
            height: n.height,
        })
        .collect()
}

/// Resolves the extent an item is clamped against, in absolute space. `None` means the item
/// is unconstrained this frame.
fn resolve_extent(
    item: &DragItem,
    internals: &NodeInternals,
    global_extent: &CoordinateExtent,
    origin: NodeOrigin,
    errors: &ErrorChannel,
) -> Option<CoordinateExtent> {
    let item_size = size(item.width.unwrap_or(0.0), item.height.unwrap_or(0.0));

    match item.extent {
        Some(NodeExtent::Parent) => {
            let measured = matches!((item.width, item.height), (Some(w), Some(h)) if w > 0.0 && h > 0.0);
            if item.parent.is_none() || !measured {
                errors.report(
                    ErrorCode::ParentExtent,
                    "only child nodes with measured dimensions can use a parent extent",
                );
                return None;
            }

            let parent_id = item.parent.as_deref()?;
            let parent = internals.node(parent_id)?;
            let (_, parent_abs) = internals.position_with_origin(parent_id, origin)?;

            let (Some(parent_width), Some(parent_height)) = (parent.width, parent.height) else {
                // Parent not yet measured: treat as unconstrained rather than guessing.
                errors.report(
                    ErrorCode::ParentExtent,
                    "parent node is not measured yet; dragging unconstrained",
                );
                return None;
            };
            if !is_numeric(parent_abs.x) || !is_numeric(parent_abs.y) {
                return None;
            }

            // The origin offset applies to both the parent's footprint and the child's own,
            // so a centered-origin child still cannot leave the parent's interior.
            let child_width = item.width.unwrap_or(0.0);
            let child_height = item.height.unwrap_or(0.0);
            Some(CoordinateExtent::new(
                point(
                    parent_abs.x + child_width * origin[0],
                    parent_abs.y + child_height * origin[1],
                ),
                point(
                    parent_abs.x + parent_width - child_width + child_width * origin[0],
                    parent_abs.y + parent_height - child_height + child_height * origin[1],
                ),
            ))
        }
        Some(NodeExtent::Rect(extent)) => {
            let extent = extent.shrink_by_size(item_size);
            match item.parent.as_deref() {
                // An explicit extent on a child node is parent-relative: translate it into
                // absolute space before clamping.
                Some(parent_id) => {
                    let (_, parent_abs) = internals.position_with_origin(parent_id, origin)?;
                    Some(extent.translate(parent_abs.to_vector()))
                }
                None => Some(extent),
            }
        }
        None => Some(global_extent.shrink_by_size(item_size)),
    }
}

/// Computes where a raw pointer-derived target position is allowed to land.
///
/// Returns the parent-relative position (to store on the node) and the absolute position
/// (for immediate consumers such as connection-line rendering).
pub fn calc_next_position(
    item: &DragItem,
    next_position: Point,
    internals: &NodeInternals,
    global_extent: &CoordinateExtent,
    origin: NodeOrigin,
    errors: &ErrorChannel,
) -> (Point, Point) {
    let extent = resolve_extent(item, internals, global_extent, origin, errors);

    let position_absolute = match extent {
        Some(extent) => extent.clamp_point(next_position),
        None => next_position,
    };

    let parent_position = item
        .parent
        .as_deref()
        .and_then(|parent_id| internals.position_with_origin(parent_id, origin))
        .map(|(_, abs)| abs)
        .unwrap_or_else(|| point(0.0, 0.0));

    (
        position_absolute - parent_position.to_vector(),
        position_absolute,
    )
}
