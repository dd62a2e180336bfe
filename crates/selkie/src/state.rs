//! Shared editor state and the operations that tie the store, drag, viewport and selection
//! components together.
//!
//! All mutations are synchronous and run against a fully-consistent snapshot: a drag frame
//! never observes a half-installed rebuild, because rebuilds are computed off to the side and
//! installed atomically.

use crate::changes::{EdgeChange, NodeChange, SelectionChange, selection_changes};
use crate::drag::{self, DragItem};
use crate::error::{ErrorChannel, OnError, Result};
use crate::geom::{CoordinateExtent, Point, Size, rect};
use crate::internals::NodeInternals;
use crate::node::{Edge, HandleBounds, Node, NodeOrigin};
use crate::selection;
use crate::viewport::{FitViewOptions, PanZoom, Viewport, nodes_inside_rect, rect_of_nodes, transform_for_bounds};

/// Recognized configuration surface.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowOptions {
    pub node_origin: NodeOrigin,
    pub elevate_nodes_on_select: bool,
    pub nodes_draggable: bool,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Global extent applied to nodes without their own.
    pub node_extent: CoordinateExtent,
    /// Run a fit-view once, automatically, when the editor becomes ready.
    pub fit_view_on_init: bool,
    /// Whether the node collection is internally owned. Controlled collections are only
    /// forwarded change-sets; the caller applies them to their own source of truth.
    pub has_default_nodes: bool,
    pub has_default_edges: bool,
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self {
            node_origin: [0.0, 0.0],
            elevate_nodes_on_select: true,
            nodes_draggable: true,
            min_zoom: 0.5,
            max_zoom: 2.0,
            node_extent: CoordinateExtent::infinite(),
            fit_view_on_init: false,
            has_default_nodes: true,
            has_default_edges: true,
        }
    }
}

pub type OnNodesChange = Box<dyn Fn(&[NodeChange])>;
pub type OnEdgesChange = Box<dyn Fn(&[EdgeChange])>;
pub type OnSelectionChange = Box<dyn Fn(&[Node], &[Edge])>;

#[derive(Default)]
pub struct FlowCallbacks {
    pub on_nodes_change: Option<OnNodesChange>,
    pub on_edges_change: Option<OnEdgesChange>,
    pub on_selection_change: Option<OnSelectionChange>,
}

impl std::fmt::Debug for FlowCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowCallbacks")
            .field("on_nodes_change", &self.callback_set(&self.on_nodes_change))
            .field("on_edges_change", &self.callback_set(&self.on_edges_change))
            .field(
                "on_selection_change",
                &self.callback_set(&self.on_selection_change),
            )
            .finish()
    }
}

impl FlowCallbacks {
    fn callback_set<T: ?Sized>(&self, cb: &Option<Box<T>>) -> bool {
        cb.is_some()
    }
}

/// A measured size (and optionally handle geometry) reported by the measurement collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionUpdate {
    pub id: String,
    pub size: Size,
    pub handle_bounds: Option<HandleBounds>,
}

pub struct FlowState {
    internals: NodeInternals,
    edges: Vec<Edge>,
    transform: Viewport,
    width: f64,
    height: f64,
    options: FlowOptions,
    pan_zoom: Option<Box<dyn PanZoom>>,
    drag_items: Vec<DragItem>,
    fit_view_on_init_done: bool,
    pub callbacks: FlowCallbacks,
    errors: ErrorChannel,
}

impl std::fmt::Debug for FlowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowState")
            .field("nodes", &self.internals.len())
            .field("edges", &self.edges.len())
            .field("transform", &self.transform)
            .field("options", &self.options)
            .field("pan_zoom", &self.pan_zoom.is_some())
            .field("drag_items", &self.drag_items.len())
            .finish()
    }
}

impl Default for FlowState {
    fn default() -> Self {
        Self::new(FlowOptions::default())
    }
}

impl FlowState {
    pub fn new(options: FlowOptions) -> Self {
        Self {
            internals: NodeInternals::default(),
            edges: Vec::new(),
            transform: Viewport::default(),
            width: 0.0,
            height: 0.0,
            options,
            pan_zoom: None,
            drag_items: Vec::new(),
            fit_view_on_init_done: false,
            callbacks: FlowCallbacks::default(),
            errors: ErrorChannel::default(),
        }
    }

    pub fn internals(&self) -> &NodeInternals {
        &self.internals
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn transform(&self) -> Viewport {
        self.transform
    }

    pub fn options(&self) -> &FlowOptions {
        &self.options
    }

    pub fn set_error_handler(&mut self, handler: Option<OnError>) {
        self.errors.set_handler(handler);
    }

    pub fn errors(&self) -> &ErrorChannel {
        &self.errors
    }

    /// Installs the node list, rebuilding the internals collection. Fails (without installing
    /// anything) on structural corruption in the parent references.
    pub fn set_nodes(&mut self, nodes: Vec<Node>) -> Result<()> {
        self.internals = NodeInternals::rebuild(
            nodes,
            &self.internals,
            self.options.node_origin,
            self.options.elevate_nodes_on_select,
        )?;
        Ok(())
    }

    pub fn set_edges(&mut self, edges: Vec<Edge>) {
        self.edges = edges;
    }

    /// Attaches the pan/zoom collaborator; the viewport engine is inert until this happens.
    pub fn set_pan_zoom(&mut self, pan_zoom: Box<dyn PanZoom>) {
        self.pan_zoom = Some(pan_zoom);
        self.maybe_initial_fit();
    }

    pub fn set_viewport_dimensions(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Direct transform write, used by pan/zoom gestures reporting back.
    pub fn set_transform(&mut self, transform: Viewport) {
        self.transform = transform;
    }

    /// True once every (non-hidden, unless included) node has measured dimensions and handle
    /// bounds. False for an empty collection.
    pub fn nodes_initialized(&self, include_hidden_nodes: bool) -> bool {
        if self.internals.is_empty() {
            return false;
        }
        self.internals
            .iter()
            .filter(|(n, _)| include_hidden_nodes || !n.hidden)
            .all(|(n, d)| n.measured() && d.handle_bounds.is_some())
    }

    /// Entry point for the measurement collaborator. Applies measured sizes and handle
    /// geometry, re-derives absolute positions (origin offsets depend on size), notifies the
    /// node change handler and, once everything is measured, runs the one-shot initial fit.
    pub fn update_node_dimensions(&mut self, updates: Vec<DimensionUpdate>) -> Result<()> {
        let mut changes: Vec<NodeChange> = Vec::new();

        for update in updates {
            let Some(node) = self.internals.node_mut(&update.id) else {
                continue;
            };
            node.width = Some(update.size.width);
            node.height = Some(update.size.height);
            if let Some(derived) = self.internals.derived_mut(&update.id) {
                if let Some(handle_bounds) = update.handle_bounds {
                    derived.handle_bounds = Some(handle_bounds);
                }
            }
            changes.push(NodeChange::Dimensions {
                id: update.id,
                size: update.size,
            });
        }

        if changes.is_empty() {
            return Ok(());
        }

        self.internals = NodeInternals::rebuild(
            self.internals.to_nodes(),
            &self.internals,
            self.options.node_origin,
            self.options.elevate_nodes_on_select,
        )?;

        if let Some(cb) = &self.callbacks.on_nodes_change {
            cb(&changes);
        }

        self.maybe_initial_fit();
        Ok(())
    }

    fn maybe_initial_fit(&mut self) {
        if self.options.fit_view_on_init
            && !self.fit_view_on_init_done
            && self.fit_view_inner(&FitViewOptions::default(), true)
        {
            self.fit_view_on_init_done = true;
        }
    }

    /// Computes and applies a transform that frames the (visible or requested) nodes in the
    /// viewport. Returns whether a transform was applied; fit-view is deferred rather than
    /// computed on partial data when any candidate node is unmeasured.
    pub fn fit_view(&mut self, options: &FitViewOptions) -> bool {
        self.fit_view_inner(options, false)
    }

    fn fit_view_inner(&mut self, options: &FitViewOptions, initial: bool) -> bool {
        if self.pan_zoom.is_none() {
            return false;
        }
        if initial && (self.fit_view_on_init_done || !self.options.fit_view_on_init) {
            return false;
        }

        let candidates: Vec<&Node> = self
            .internals
            .nodes()
            .filter(|n| {
                let visible = if options.include_hidden_nodes {
                    n.measured()
                } else {
                    !n.hidden
                };
                if options.nodes.is_empty() {
                    visible
                } else {
                    visible && options.nodes.iter().any(|id| *id == n.id)
                }
            })
            .collect();

        if candidates.is_empty() || !candidates.iter().all(|n| n.measured()) {
            tracing::debug!(initial, "fit-view deferred: no measured candidates");
            return false;
        }

        let Some(bounds) = rect_of_nodes(
            &self.internals,
            candidates.into_iter(),
            self.options.node_origin,
        ) else {
            return false;
        };

        let target = transform_for_bounds(
            bounds,
            self.width,
            self.height,
            options.min_zoom.unwrap_or(self.options.min_zoom),
            options.max_zoom.unwrap_or(self.options.max_zoom),
            options.padding,
        );

        self.transform = target;
        if let Some(pan_zoom) = self.pan_zoom.as_mut() {
            pan_zoom.set_viewport(target, options.duration_ms);
        }

        tracing::debug!(?target, initial, "fit-view applied");
        true
    }

    /// Nodes intersecting the current viewport under the current transform.
    pub fn visible_nodes(&self) -> Vec<&Node> {
        nodes_inside_rect(
            &self.internals,
            rect(0.0, 0.0, self.width, self.height),
            &self.transform,
            true,
            self.options.node_origin,
        )
    }

    /// Starts a drag gesture at `pointer`, optionally anchored on an explicitly dragged node.
    /// Returns the number of participating nodes.
    pub fn start_drag(&mut self, pointer: Point, node_id: Option<&str>) -> usize {
        self.drag_items = drag::drag_items(
            &self.internals,
            self.options.nodes_draggable,
            pointer,
            node_id,
        );
        self.drag_items.len()
    }

    pub fn dragging(&self) -> bool {
        !self.drag_items.is_empty()
    }

    /// One pointer-move frame: resolves every drag item against its extent, writes positions
    /// back (default-owned collections only) and notifies the node change handler.
    pub fn drag_to(&mut self, pointer: Point) -> Result<()> {
        if self.drag_items.is_empty() {
            return Ok(());
        }

        let mut items = std::mem::take(&mut self.drag_items);
        let mut changes: Vec<NodeChange> = Vec::with_capacity(items.len());

        for item in &mut items {
            let raw_next = pointer - item.distance;
            let (position, position_absolute) = drag::calc_next_position(
                item,
                raw_next,
                &self.internals,
                &self.options.node_extent,
                self.options.node_origin,
                &self.errors,
            );

            item.delta = position_absolute - item.position_absolute;
            item.position = position;
            item.position_absolute = position_absolute;

            changes.push(NodeChange::Position {
                id: item.id.clone(),
                position,
                position_absolute,
                dragging: true,
            });
        }

        if self.options.has_default_nodes {
            for item in &items {
                if let Some(node) = self.internals.node_mut(&item.id) {
                    node.position = item.position;
                }
            }
            // Children of a dragged parent pick up their new absolutes here.
            self.internals = NodeInternals::rebuild(
                self.internals.to_nodes(),
                &self.internals,
                self.options.node_origin,
                self.options.elevate_nodes_on_select,
            )?;
        }

        self.drag_items = items;

        if let Some(cb) = &self.callbacks.on_nodes_change {
            cb(&changes);
        }
        Ok(())
    }

    /// Ends the gesture: emits the final positions with the dragging flag cleared and drops
    /// the ephemeral drag items.
    pub fn end_drag(&mut self) -> Vec<DragItem> {
        let items = std::mem::take(&mut self.drag_items);
        if items.is_empty() {
            return items;
        }

        let changes: Vec<NodeChange> = items
            .iter()
            .map(|item| NodeChange::Position {
                id: item.id.clone(),
                position: item.position,
                position_absolute: item.position_absolute,
                dragging: false,
            })
            .collect();

        if let Some(cb) = &self.callbacks.on_nodes_change {
            cb(&changes);
        }
        items
    }

    /// Applies batched selection change-sets to nodes and edges.
    ///
    /// Default-owned collections are reconciled copy-on-write; controlled collections are
    /// left alone. The external change handlers always receive the raw change-sets, and the
    /// aggregate selection handler fires afterwards.
    pub fn apply_selection_changes(
        &mut self,
        node_changes: &[SelectionChange],
        edge_changes: &[SelectionChange],
    ) {
        if !node_changes.is_empty() {
            if self.options.has_default_nodes {
                self.internals = selection::apply_node_selection(&self.internals, node_changes);
            }
            let changes: Vec<NodeChange> = node_changes
                .iter()
                .map(|c| NodeChange::Select {
                    id: c.id.clone(),
                    selected: c.selected,
                })
                .collect();
            if let Some(cb) = &self.callbacks.on_nodes_change {
                cb(&changes);
            }
        }

        if !edge_changes.is_empty() {
            if self.options.has_default_edges {
                self.edges = selection::apply_edge_selection(&self.edges, edge_changes);
            }
            let changes: Vec<EdgeChange> = edge_changes
                .iter()
                .map(|c| EdgeChange::Select {
                    id: c.id.clone(),
                    selected: c.selected,
                })
                .collect();
            if let Some(cb) = &self.callbacks.on_edges_change {
                cb(&changes);
            }
        }

        if node_changes.is_empty() && edge_changes.is_empty() {
            return;
        }
        if let Some(cb) = &self.callbacks.on_selection_change {
            let selected_nodes: Vec<Node> = self
                .internals
                .nodes()
                .filter(|n| n.selected)
                .cloned()
                .collect();
            let selected_edges: Vec<Edge> =
                self.edges.iter().filter(|e| e.selected).cloned().collect();
            cb(&selected_nodes, &selected_edges);
        }
    }

    /// Moves the node selection to exactly `ids` and clears the edge selection.
    pub fn add_selected_nodes(&mut self, ids: &[String]) {
        let selected: rustc_hash::FxHashSet<String> = ids.iter().cloned().collect();
        let node_changes = selection_changes(
            self.internals.nodes().map(|n| (n.id.as_str(), n.selected)),
            &selected,
        );
        let edge_changes = selection_changes(
            self.edges.iter().map(|e| (e.id.as_str(), e.selected)),
            &rustc_hash::FxHashSet::default(),
        );
        self.apply_selection_changes(&node_changes, &edge_changes);
    }

    /// Unselects every node and edge.
    pub fn reset_selected_elements(&mut self) {
        let none = rustc_hash::FxHashSet::default();
        let node_changes = selection_changes(
            self.internals.nodes().map(|n| (n.id.as_str(), n.selected)),
            &none,
        );
        let edge_changes = selection_changes(
            self.edges.iter().map(|e| (e.id.as_str(), e.selected)),
            &none,
        );
        self.apply_selection_changes(&node_changes, &edge_changes);
    }
}
