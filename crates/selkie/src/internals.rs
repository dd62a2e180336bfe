//! The authoritative mapping from node id to node state plus derived fields.
//!
//! Derived fields (absolute position, resolved z-order, parent flag, handle bounds) are kept
//! in a side table keyed by node id instead of being attached to the user's own records, so
//! they can never leak through cloning or serialization of user data.

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{Error, Result};
use crate::geom::{Point, point, vector};
use crate::node::{HandleBounds, Node, NodeOrigin};

/// Z-order offset applied to selected nodes when `elevate_nodes_on_select` is enabled.
pub const SELECTED_Z_BOOST: i64 = 1000;

/// Store-owned state derived from the node forest. Never user-supplied.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeDerived {
    /// Position resolved through the full parent chain.
    pub position_absolute: Point,
    /// Explicit z-index plus selection boost, raised to at least the z of every ancestor.
    pub z: i64,
    /// True if any other node references this one as parent.
    pub is_parent: bool,
    /// Connection-point geometry, populated by measurement.
    pub handle_bounds: Option<HandleBounds>,
}

#[derive(Debug, Clone, Default)]
pub struct NodeInternals {
    nodes: IndexMap<String, Node>,
    derived: FxHashMap<String, NodeDerived>,
}

impl NodeInternals {
    /// Builds a fresh internals collection from an incoming node list.
    ///
    /// Previously measured width/height and handle bounds are carried forward by id, since
    /// measurement is asynchronous and a node may appear before it is measured. The whole
    /// forest's absolute positions and z-values are recomputed in a second pass.
    ///
    /// Fails on structural corruption (missing parent, parent cycle) without installing a
    /// partial result.
    pub fn rebuild(
        nodes: Vec<Node>,
        previous: &NodeInternals,
        origin: NodeOrigin,
        elevate_nodes_on_select: bool,
    ) -> Result<Self> {
        let mut next = NodeInternals {
            nodes: IndexMap::with_capacity(nodes.len()),
            derived: FxHashMap::default(),
        };
        let mut parent_ids: FxHashSet<String> = FxHashSet::default();
        let selected_z_boost = if elevate_nodes_on_select {
            SELECTED_Z_BOOST
        } else {
            0
        };

        for mut node in nodes {
            let prev_node = previous.nodes.get(&node.id);
            node.width = node.width.or(prev_node.and_then(|n| n.width));
            node.height = node.height.or(prev_node.and_then(|n| n.height));

            let z = i64::from(node.z_index.unwrap_or(0).max(0))
                + if node.selected { selected_z_boost } else { 0 };

            let derived = NodeDerived {
                position_absolute: node.position,
                z,
                is_parent: false,
                handle_bounds: previous
                    .derived
                    .get(&node.id)
                    .and_then(|d| d.handle_bounds.clone()),
            };

            if let Some(parent) = &node.parent {
                parent_ids.insert(parent.clone());
            }

            next.derived.insert(node.id.clone(), derived);
            next.nodes.insert(node.id.clone(), node);
        }

        next.propagate_absolute_positions(origin, &parent_ids)?;

        tracing::debug!(
            nodes = next.nodes.len(),
            parents = parent_ids.len(),
            "rebuilt node internals"
        );

        Ok(next)
    }

    /// Second rebuild pass: resolves absolute position and effective z for every node with a
    /// parent, and marks referenced parents.
    fn propagate_absolute_positions(
        &mut self,
        origin: NodeOrigin,
        parent_ids: &FxHashSet<String>,
    ) -> Result<()> {
        let mut resolved: Vec<(String, Point, i64)> = Vec::new();

        for node in self.nodes.values() {
            if let Some(parent) = &node.parent {
                if !self.nodes.contains_key(parent) {
                    return Err(Error::MissingParent {
                        child: node.id.clone(),
                        parent: parent.clone(),
                    });
                }
                let (abs, z) = self.resolve_through_parents(node, origin)?;
                resolved.push((node.id.clone(), abs, z));
            }
        }

        for (id, abs, z) in resolved {
            if let Some(derived) = self.derived.get_mut(&id) {
                derived.position_absolute = abs;
                derived.z = z;
            }
        }

        for id in parent_ids {
            if let Some(derived) = self.derived.get_mut(id) {
                derived.is_parent = true;
            }
        }

        Ok(())
    }

    /// Iterative parent-chain walk with a visited-set guard. Parent references are acyclic by
    /// invariant; a cycle here means caller-side corruption and is surfaced as a fatal error
    /// rather than an infinite loop.
    fn resolve_through_parents(&self, node: &Node, origin: NodeOrigin) -> Result<(Point, i64)> {
        let mut x = node.position.x;
        let mut y = node.position.y;
        let mut z = self.derived.get(&node.id).map(|d| d.z).unwrap_or(0);

        let mut visited: FxHashSet<&str> = FxHashSet::default();
        visited.insert(node.id.as_str());

        let mut current = node.parent.as_deref();
        while let Some(parent_id) = current {
            if !visited.insert(parent_id) {
                return Err(Error::ParentCycle {
                    node: node.id.clone(),
                });
            }
            let parent = self.nodes.get(parent_id).ok_or_else(|| Error::MissingParent {
                child: node.id.clone(),
                parent: parent_id.to_string(),
            })?;

            let parent_pos = origin_adjusted(parent.position, parent, origin);
            x += parent_pos.x;
            y += parent_pos.y;
            z = z.max(self.derived.get(parent_id).map(|d| d.z).unwrap_or(0));

            current = parent.parent.as_deref();
        }

        Ok((point(x, y), z))
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub(crate) fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn derived(&self, id: &str) -> Option<&NodeDerived> {
        self.derived.get(id)
    }

    pub(crate) fn derived_mut(&mut self, id: &str) -> Option<&mut NodeDerived> {
        self.derived.get_mut(id)
    }

    pub fn position_absolute(&self, id: &str) -> Option<Point> {
        self.derived.get(id).map(|d| d.position_absolute)
    }

    /// A node's relative and absolute position shifted by the origin offset applied to its
    /// own footprint. Unmeasured dimensions count as zero.
    pub fn position_with_origin(&self, id: &str, origin: NodeOrigin) -> Option<(Point, Point)> {
        let node = self.nodes.get(id)?;
        let abs = self.position_absolute(id).unwrap_or(node.position);
        Some((
            origin_adjusted(node.position, node, origin),
            origin_adjusted(abs, node, origin),
        ))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Node, &NodeDerived)> {
        self.nodes
            .values()
            .filter_map(|n| self.derived.get(&n.id).map(|d| (n, d)))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Clones the user-facing node list in insertion order.
    pub fn to_nodes(&self) -> Vec<Node> {
        self.nodes.values().cloned().collect()
    }
}

/// Shifts `pos` by the node's width/height weighted by the origin fractions.
pub(crate) fn origin_adjusted(pos: Point, node: &Node, origin: NodeOrigin) -> Point {
    let offset = vector(
        node.width.unwrap_or(0.0) * origin[0],
        node.height.unwrap_or(0.0) * origin[1],
    );
    pos - offset
}
