use std::cell::RefCell;
use std::rc::Rc;

use selkie::drag::{DragItem, calc_next_position, drag_items, is_ancestor_selected};
use selkie::geom::{CoordinateExtent, point, vector};
use selkie::internals::NodeInternals;
use selkie::node::{Node, NodeExtent};
use selkie::{ErrorChannel, ErrorCode, FlowState, NodeChange};

fn internals_of(nodes: Vec<Node>) -> NodeInternals {
    NodeInternals::rebuild(nodes, &NodeInternals::default(), [0.0, 0.0], true).unwrap()
}

fn item(id: &str, x: f64, y: f64) -> DragItem {
    DragItem {
        id: id.to_string(),
        position: point(x, y),
        position_absolute: point(x, y),
        distance: vector(0.0, 0.0),
        delta: vector(0.0, 0.0),
        extent: None,
        parent: None,
        width: Some(10.0),
        height: Some(10.0),
    }
}

fn capturing_channel() -> (ErrorChannel, Rc<RefCell<Vec<ErrorCode>>>) {
    let seen: Rc<RefCell<Vec<ErrorCode>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let channel = ErrorChannel::new(Box::new(move |code, _| sink.borrow_mut().push(code)));
    (channel, seen)
}

#[test]
fn clamping_is_a_noop_when_the_target_is_in_bounds() {
    let mut dragged = item("a", 0.0, 0.0);
    dragged.extent = Some(NodeExtent::Rect(CoordinateExtent::new(
        point(0.0, 0.0),
        point(100.0, 100.0),
    )));

    let internals = internals_of(vec![Node::new("a", 0.0, 0.0)]);
    let errors = ErrorChannel::default();
    let (position, absolute) = calc_next_position(
        &dragged,
        point(40.0, 40.0),
        &internals,
        &CoordinateExtent::infinite(),
        [0.0, 0.0],
        &errors,
    );
    assert_eq!(position, point(40.0, 40.0));
    assert_eq!(absolute, point(40.0, 40.0));
}

#[test]
fn extent_far_corner_is_shrunk_by_the_item_size() {
    let mut dragged = item("a", 0.0, 0.0);
    dragged.extent = Some(NodeExtent::Rect(CoordinateExtent::new(
        point(0.0, 0.0),
        point(100.0, 100.0),
    )));

    let internals = internals_of(vec![Node::new("a", 0.0, 0.0)]);
    let errors = ErrorChannel::default();
    // 10x10 item dragged to (95, 95): the far edge, not the origin, respects the bound.
    let (_, absolute) = calc_next_position(
        &dragged,
        point(95.0, 95.0),
        &internals,
        &CoordinateExtent::infinite(),
        [0.0, 0.0],
        &errors,
    );
    assert_eq!(absolute, point(90.0, 90.0));
}

#[test]
fn parent_extent_keeps_the_child_inside_its_parent() {
    let internals = internals_of(vec![
        Node::new("p", 0.0, 0.0).with_size(100.0, 100.0),
        Node::new("c", 10.0, 10.0)
            .with_parent("p")
            .with_size(20.0, 20.0)
            .with_extent(NodeExtent::Parent),
    ]);

    let mut dragged = item("c", 10.0, 10.0);
    dragged.parent = Some("p".to_string());
    dragged.extent = Some(NodeExtent::Parent);
    dragged.width = Some(20.0);
    dragged.height = Some(20.0);

    let errors = ErrorChannel::default();
    let (position, absolute) = calc_next_position(
        &dragged,
        point(95.0, 95.0),
        &internals,
        &CoordinateExtent::infinite(),
        [0.0, 0.0],
        &errors,
    );
    assert_eq!(absolute, point(80.0, 80.0));
    assert_eq!(position, point(80.0, 80.0));
}

#[test]
fn parent_extent_applies_the_origin_to_both_footprints() {
    let internals = internals_of(vec![
        Node::new("p", 100.0, 100.0).with_size(100.0, 100.0),
        Node::new("c", 0.0, 0.0)
            .with_parent("p")
            .with_size(20.0, 20.0)
            .with_extent(NodeExtent::Parent),
    ]);

    let mut dragged = item("c", 0.0, 0.0);
    dragged.parent = Some("p".to_string());
    dragged.extent = Some(NodeExtent::Parent);
    dragged.width = Some(20.0);
    dragged.height = Some(20.0);

    let errors = ErrorChannel::default();
    // Centered origin: parent footprint starts at (50, 50); both the parent's and the
    // child's own origin offsets shift the allowed band.
    let (_, absolute) = calc_next_position(
        &dragged,
        point(0.0, 0.0),
        &internals,
        &CoordinateExtent::infinite(),
        [0.5, 0.5],
        &errors,
    );
    assert_eq!(absolute, point(60.0, 60.0));
}

#[test]
fn parent_extent_without_a_parent_reports_005_and_falls_back() {
    let internals = internals_of(vec![Node::new("a", 0.0, 0.0)]);
    let mut dragged = item("a", 0.0, 0.0);
    dragged.extent = Some(NodeExtent::Parent);

    let (errors, seen) = capturing_channel();
    let (_, absolute) = calc_next_position(
        &dragged,
        point(500.0, 500.0),
        &internals,
        &CoordinateExtent::infinite(),
        [0.0, 0.0],
        &errors,
    );
    // Gesture continues unconstrained instead of crashing.
    assert_eq!(absolute, point(500.0, 500.0));
    assert_eq!(seen.borrow().as_slice(), [ErrorCode::ParentExtent]);
    assert_eq!(ErrorCode::ParentExtent.code(), "005");
}

#[test]
fn parent_extent_with_unmeasured_parent_reports_005_and_falls_back() {
    let internals = internals_of(vec![
        Node::new("p", 0.0, 0.0),
        Node::new("c", 10.0, 10.0)
            .with_parent("p")
            .with_size(20.0, 20.0)
            .with_extent(NodeExtent::Parent),
    ]);

    let mut dragged = item("c", 10.0, 10.0);
    dragged.parent = Some("p".to_string());
    dragged.extent = Some(NodeExtent::Parent);
    dragged.width = Some(20.0);
    dragged.height = Some(20.0);

    let (errors, seen) = capturing_channel();
    let (_, absolute) = calc_next_position(
        &dragged,
        point(500.0, 500.0),
        &internals,
        &CoordinateExtent::infinite(),
        [0.0, 0.0],
        &errors,
    );
    assert_eq!(absolute, point(500.0, 500.0));
    assert_eq!(seen.borrow().as_slice(), [ErrorCode::ParentExtent]);
}

#[test]
fn explicit_extent_on_a_child_is_parent_relative() {
    let internals = internals_of(vec![
        Node::new("p", 100.0, 200.0),
        Node::new("c", 0.0, 0.0).with_parent("p").with_size(0.0, 0.0),
    ]);

    let mut dragged = item("c", 0.0, 0.0);
    dragged.parent = Some("p".to_string());
    dragged.width = Some(0.0);
    dragged.height = Some(0.0);
    dragged.extent = Some(NodeExtent::Rect(CoordinateExtent::new(
        point(0.0, 0.0),
        point(50.0, 50.0),
    )));

    let errors = ErrorChannel::default();
    let (position, absolute) = calc_next_position(
        &dragged,
        point(0.0, 0.0),
        &internals,
        &CoordinateExtent::infinite(),
        [0.0, 0.0],
        &errors,
    );
    // The [0,50] band is translated by the parent's absolute position before clamping.
    assert_eq!(absolute, point(100.0, 200.0));
    assert_eq!(position, point(0.0, 0.0));
}

#[test]
fn global_extent_applies_when_the_node_has_none() {
    let internals = internals_of(vec![Node::new("a", 0.0, 0.0)]);
    let dragged = item("a", 0.0, 0.0);

    let errors = ErrorChannel::default();
    let global = CoordinateExtent::new(point(-10.0, -10.0), point(30.0, 30.0));
    let (_, absolute) = calc_next_position(
        &dragged,
        point(100.0, -100.0),
        &internals,
        &global,
        [0.0, 0.0],
        &errors,
    );
    assert_eq!(absolute, point(20.0, -10.0));
}

#[test]
fn child_of_a_selected_parent_does_not_drag_twice() {
    let mut parent = Node::new("p", 0.0, 0.0);
    parent.selected = true;
    let mut child = Node::new("c", 10.0, 10.0).with_parent("p");
    child.selected = true;
    let internals = internals_of(vec![parent, child]);

    let items = drag_items(&internals, true, point(0.0, 0.0), None);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "p");
}

#[test]
fn selected_child_of_an_unselected_parent_drags_alone() {
    let parent = Node::new("p", 0.0, 0.0);
    let mut child = Node::new("c", 10.0, 10.0).with_parent("p");
    child.selected = true;
    let internals = internals_of(vec![parent, child]);

    assert!(!is_ancestor_selected(internals.node("c").unwrap(), &internals));
    let items = drag_items(&internals, true, point(0.0, 0.0), None);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "c");
}

#[test]
fn draggable_override_beats_the_global_default() {
    let mut frozen = Node::new("a", 0.0, 0.0);
    frozen.selected = true;
    frozen.draggable = Some(false);
    let mut free = Node::new("b", 0.0, 0.0);
    free.selected = true;
    let internals = internals_of(vec![frozen, free]);

    let items = drag_items(&internals, true, point(0.0, 0.0), None);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "b");

    // Global default off: only explicit overrides drag.
    let mut opt_in = Node::new("c", 0.0, 0.0);
    opt_in.selected = true;
    opt_in.draggable = Some(true);
    let mut plain = Node::new("d", 0.0, 0.0);
    plain.selected = true;
    let internals = internals_of(vec![opt_in, plain]);
    let items = drag_items(&internals, false, point(0.0, 0.0), None);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "c");
}

#[test]
fn drag_items_capture_the_pointer_distance() {
    let mut node = Node::new("a", 10.0, 20.0);
    node.selected = true;
    let internals = internals_of(vec![node]);

    let items = drag_items(&internals, true, point(50.0, 50.0), None);
    assert_eq!(items[0].distance, vector(40.0, 30.0));
}

#[test]
fn dragging_a_parent_carries_its_children() {
    let mut state = FlowState::default();
    state
        .set_nodes(vec![
            Node::new("p", 0.0, 0.0),
            Node::new("c", 10.0, 10.0).with_parent("p"),
        ])
        .unwrap();

    let changes: Rc<RefCell<Vec<NodeChange>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = changes.clone();
    state.callbacks.on_nodes_change = Some(Box::new(move |cs| {
        sink.borrow_mut().extend_from_slice(cs);
    }));

    assert_eq!(state.start_drag(point(50.0, 50.0), Some("p")), 1);
    state.drag_to(point(60.0, 70.0)).unwrap();

    assert_eq!(
        state.internals().node("p").unwrap().position,
        point(10.0, 20.0)
    );
    // The child keeps its relative position; its absolute follows from the rebuild.
    assert_eq!(
        state.internals().position_absolute("c"),
        Some(point(20.0, 30.0))
    );

    let dragging: Vec<bool> = changes
        .borrow()
        .iter()
        .map(|c| matches!(c, NodeChange::Position { dragging: true, .. }))
        .collect();
    assert_eq!(dragging, [true]);

    let items = state.end_drag();
    assert_eq!(items.len(), 1);
    assert!(matches!(
        changes.borrow().last().unwrap(),
        NodeChange::Position {
            dragging: false,
            ..
        }
    ));
}
