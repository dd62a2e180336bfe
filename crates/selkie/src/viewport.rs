//! Viewport transform math: node bounds, fit-view transforms, visibility queries.

use serde::{Deserialize, Serialize};

use crate::geom::{Rect, bounds_of_rects, clamp, overlapping_area, rect, size};
use crate::internals::{NodeInternals, origin_adjusted};
use crate::node::{Node, NodeOrigin};

/// The translate+scale triple mapping node-space to screen-space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

/// Low-level pan/zoom collaborator. Owns gesture-to-transform translation; the core only
/// computes target transforms and asks it to apply them.
pub trait PanZoom {
    /// Applies a target viewport, instantly when `duration_ms` is zero or animated over the
    /// given duration otherwise. A new request supersedes a running animation.
    fn set_viewport(&mut self, viewport: Viewport, duration_ms: f64);
}

#[derive(Debug, Clone, PartialEq)]
pub struct FitViewOptions {
    /// Padding around the fitted bounds, as a fraction of the viewport size.
    pub padding: f64,
    /// Consider nodes with measured dimensions even when hidden.
    pub include_hidden_nodes: bool,
    pub min_zoom: Option<f64>,
    pub max_zoom: Option<f64>,
    /// Animation duration in milliseconds; zero applies the transform instantly.
    pub duration_ms: f64,
    /// Restricts the fit to these node ids when non-empty.
    pub nodes: Vec<String>,
}

impl Default for FitViewOptions {
    fn default() -> Self {
        Self {
            padding: 0.1,
            include_hidden_nodes: false,
            min_zoom: None,
            max_zoom: None,
            duration_ms: 0.0,
            nodes: Vec::new(),
        }
    }
}

/// Union bounding box of `nodes` in absolute space, respecting the origin offset. `None` for
/// an empty iterator.
pub fn rect_of_nodes<'a>(
    internals: &NodeInternals,
    nodes: impl Iterator<Item = &'a Node>,
    origin: NodeOrigin,
) -> Option<Rect> {
    let mut bounds: Option<Rect> = None;

    for node in nodes {
        let abs = internals
            .position_absolute(&node.id)
            .unwrap_or(node.position);
        let abs = origin_adjusted(abs, node, origin);
        let node_rect = Rect::new(
            abs,
            size(node.width.unwrap_or(0.0), node.height.unwrap_or(0.0)),
        );
        bounds = Some(match bounds {
            Some(b) => bounds_of_rects(b, node_rect),
            None => node_rect,
        });
    }

    bounds
}

/// Computes the transform that fits `bounds` into a `width` x `height` viewport with the
/// given fractional padding, the scale clamped into `[min_zoom, max_zoom]`. The center of the
/// bounds maps to the center of the viewport.
pub fn transform_for_bounds(
    bounds: Rect,
    width: f64,
    height: f64,
    min_zoom: f64,
    max_zoom: f64,
    padding: f64,
) -> Viewport {
    let x_zoom = width / (bounds.size.width * (1.0 + padding));
    let y_zoom = height / (bounds.size.height * (1.0 + padding));
    let zoom = clamp(x_zoom.min(y_zoom), min_zoom, max_zoom);

    let bounds_center = bounds.center();
    Viewport {
        x: width / 2.0 - bounds_center.x * zoom,
        y: height / 2.0 - bounds_center.y * zoom,
        zoom,
    }
}

/// Nodes whose footprint intersects a screen-space rect under `transform`.
///
/// With `partially` set, any overlap counts; otherwise the node must be fully contained.
/// Unmeasured nodes are always included, since their footprint is unknown.
pub fn nodes_inside_rect<'a>(
    internals: &'a NodeInternals,
    screen_rect: Rect,
    transform: &Viewport,
    partially: bool,
    origin: NodeOrigin,
) -> Vec<&'a Node> {
    let pane_rect = rect(
        (screen_rect.origin.x - transform.x) / transform.zoom,
        (screen_rect.origin.y - transform.y) / transform.zoom,
        screen_rect.size.width / transform.zoom,
        screen_rect.size.height / transform.zoom,
    );

    internals
        .iter()
        .filter(|(node, _)| !node.hidden)
        .filter(|(node, derived)| {
            let abs = origin_adjusted(derived.position_absolute, node, origin);
            let width = node.width.unwrap_or(0.0);
            let height = node.height.unwrap_or(0.0);
            let node_rect = Rect::new(abs, size(width, height));

            let overlap = overlapping_area(pane_rect, node_rect);
            let unmeasured = node.width.is_none() || node.height.is_none();

            unmeasured || (partially && overlap > 0.0) || overlap >= width * height
        })
        .map(|(node, _)| node)
        .collect()
}
