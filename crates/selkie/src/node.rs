//! User-facing node and edge records.
//!
//! These hold only caller-supplied data plus asynchronously measured dimensions. Everything
//! derived from the parent/child forest (absolute positions, resolved z-order, parent flags,
//! handle bounds) lives in the side table kept by [`crate::internals::NodeInternals`], so user
//! records never grow hidden fields.

use serde::{Deserialize, Serialize};

use crate::geom::{CoordinateExtent, Point, point};

/// Fractional offset describing how a node's declared position relates to its bounding box:
/// `[0, 0]` means the position is the top-left corner, `[0.5, 0.5]` means it is the center.
pub type NodeOrigin = [f64; 2];

/// Bounding extent of a node: either an absolute (or parent-relative, when the node has a
/// parent) rectangle, or the interior footprint of the node's parent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeExtent {
    Parent,
    Rect(CoordinateExtent),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    /// Position relative to the parent node, or to the viewport origin for root nodes.
    pub position: Point,
    /// Owning parent node, if any. Parent references must form a forest.
    pub parent: Option<String>,
    /// Measured width; `None` until the measurement collaborator reports it.
    pub width: Option<f64>,
    /// Measured height; `None` until the measurement collaborator reports it.
    pub height: Option<f64>,
    pub extent: Option<NodeExtent>,
    pub selected: bool,
    pub hidden: bool,
    pub z_index: Option<i32>,
    /// Per-node override of the global draggable default.
    pub draggable: Option<bool>,
}

impl Node {
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            position: point(x, y),
            parent: None,
            width: None,
            height: None,
            extent: None,
            selected: false,
            hidden: false,
            z_index: None,
            draggable: None,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_extent(mut self, extent: NodeExtent) -> Self {
        self.extent = Some(extent);
        self
    }

    pub fn measured(&self) -> bool {
        matches!((self.width, self.height), (Some(w), Some(h)) if w > 0.0 && h > 0.0)
    }
}

/// A directed connection between two node identifiers. The core only ever mutates the
/// selection flag; creation and removal belong to external change handlers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub selected: bool,
    pub hidden: bool,
}

impl Edge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            selected: false,
            hidden: false,
        }
    }
}

/// Which side of a node a connection handle sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleSide {
    Top,
    Right,
    Bottom,
    Left,
}

/// Geometry of a single connection point, relative to its node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Handle {
    pub id: Option<String>,
    pub side: HandleSide,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Handle geometry for one node, populated by the measurement collaborator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HandleBounds {
    pub source: Vec<Handle>,
    pub target: Vec<Handle>,
}
