//! Graph convenience queries over plain node/edge slices.

use rustc_hash::FxHashSet;

use crate::node::{Edge, Node};

/// Source/target pair describing where an edge should connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub source: String,
    pub target: String,
}

/// Nodes with an edge pointing at `id`.
pub fn get_incomers<'a>(id: &str, nodes: &'a [Node], edges: &[Edge]) -> Vec<&'a Node> {
    let incomer_ids: FxHashSet<&str> = edges
        .iter()
        .filter(|e| e.target == id)
        .map(|e| e.source.as_str())
        .collect();
    nodes
        .iter()
        .filter(|n| incomer_ids.contains(n.id.as_str()))
        .collect()
}

/// Nodes that `id` points at.
pub fn get_outgoers<'a>(id: &str, nodes: &'a [Node], edges: &[Edge]) -> Vec<&'a Node> {
    let outgoer_ids: FxHashSet<&str> = edges
        .iter()
        .filter(|e| e.source == id)
        .map(|e| e.target.as_str())
        .collect();
    nodes
        .iter()
        .filter(|n| outgoer_ids.contains(n.id.as_str()))
        .collect()
}

/// Every edge touching at least one of `ids`.
pub fn get_connected_edges<'a>(ids: &[String], edges: &'a [Edge]) -> Vec<&'a Edge> {
    let ids: FxHashSet<&str> = ids.iter().map(String::as_str).collect();
    edges
        .iter()
        .filter(|e| ids.contains(e.source.as_str()) || ids.contains(e.target.as_str()))
        .collect()
}

/// Appends `edge` unless an edge with the same source and target already exists.
pub fn add_edge(edge: Edge, mut edges: Vec<Edge>) -> Vec<Edge> {
    let exists = edges
        .iter()
        .any(|e| e.source == edge.source && e.target == edge.target);
    if exists {
        tracing::debug!(id = %edge.id, "skipping duplicate edge");
        return edges;
    }
    edges.push(edge);
    edges
}

/// Re-anchors an existing edge onto a new connection, keeping its identity-independent
/// fields. The old edge is removed and the rewired one appended.
pub fn update_edge(old_edge: &Edge, connection: Connection, edges: Vec<Edge>) -> Vec<Edge> {
    let next: Vec<Edge> = edges.into_iter().filter(|e| e.id != old_edge.id).collect();

    let mut rewired = old_edge.clone();
    rewired.id = format!("{}-{}", connection.source, connection.target);
    rewired.source = connection.source;
    rewired.target = connection.target;

    add_edge(rewired, next)
}
