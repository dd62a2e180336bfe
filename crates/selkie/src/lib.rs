#![forbid(unsafe_code)]

//! Headless flow-diagram state core.
//!
//! Design goals:
//! - deterministic, testable state transitions (no rendering, no DOM, no executor)
//! - derived node state (absolute positions, z-order, parent flags) kept in a side table,
//!   never attached to user records
//! - recoverable misconfigurations degrade through an error channel instead of crashing;
//!   structural corruption fails fast before anything is installed
//!
//! Rendering, gesture decoding and styling are external collaborators; see
//! [`viewport::PanZoom`] and the callbacks on [`FlowState`].

pub mod changes;
pub mod drag;
pub mod error;
pub mod geom;
pub mod graph;
pub mod internals;
pub mod marker;
pub mod node;
pub mod selection;
pub mod state;
pub mod viewport;

pub use changes::{
    EdgeChange, NodeChange, SelectionChange, apply_edge_changes, apply_node_changes,
};
pub use drag::{DragItem, calc_next_position, drag_items, is_ancestor_selected};
pub use error::{Error, ErrorChannel, ErrorCode, OnError, Result};
pub use geom::{CoordinateExtent, Point, Rect, Size, Vector, point, vector};
pub use graph::{Connection, add_edge, get_connected_edges, get_incomers, get_outgoers, update_edge};
pub use internals::{NodeDerived, NodeInternals, SELECTED_Z_BOOST};
pub use marker::MarkerType;
pub use node::{Edge, Handle, HandleBounds, HandleSide, Node, NodeExtent, NodeOrigin};
pub use state::{
    DimensionUpdate, FlowCallbacks, FlowOptions, FlowState, OnEdgesChange, OnNodesChange,
    OnSelectionChange,
};
pub use viewport::{
    FitViewOptions, PanZoom, Viewport, nodes_inside_rect, rect_of_nodes, transform_for_bounds,
};

/// Observable wrapper around [`FlowState`]. Consumers subscribe to projected slices (the
/// transform, the selected set, node counts) and are notified only when their slice changes.
pub type FlowStore = selkie_store::Store<state::FlowState>;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
