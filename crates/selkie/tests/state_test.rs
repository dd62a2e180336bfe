use selkie::geom::{point, size};
use selkie::node::{HandleBounds, Node};
use selkie::viewport::Viewport;
use selkie::{DimensionUpdate, FlowState};

#[test]
fn nodes_initialized_requires_dimensions_and_handle_bounds() {
    let mut state = FlowState::default();
    assert!(!state.nodes_initialized(false));

    state
        .set_nodes(vec![Node::new("a", 0.0, 0.0), Node::new("b", 0.0, 0.0)])
        .unwrap();
    assert!(!state.nodes_initialized(false));

    state
        .update_node_dimensions(vec![DimensionUpdate {
            id: "a".into(),
            size: size(10.0, 10.0),
            handle_bounds: Some(HandleBounds::default()),
        }])
        .unwrap();
    assert!(!state.nodes_initialized(false));

    state
        .update_node_dimensions(vec![DimensionUpdate {
            id: "b".into(),
            size: size(10.0, 10.0),
            handle_bounds: Some(HandleBounds::default()),
        }])
        .unwrap();
    assert!(state.nodes_initialized(false));
}

#[test]
fn hidden_nodes_only_count_when_included() {
    let mut state = FlowState::default();
    let mut hidden = Node::new("h", 0.0, 0.0);
    hidden.hidden = true;
    state
        .set_nodes(vec![Node::new("a", 0.0, 0.0), hidden])
        .unwrap();

    state
        .update_node_dimensions(vec![DimensionUpdate {
            id: "a".into(),
            size: size(10.0, 10.0),
            handle_bounds: Some(HandleBounds::default()),
        }])
        .unwrap();

    assert!(state.nodes_initialized(false));
    assert!(!state.nodes_initialized(true));
}

#[test]
fn set_transform_records_pan_zoom_gestures() {
    let mut state = FlowState::default();
    let vp = Viewport {
        x: 12.0,
        y: -3.0,
        zoom: 1.5,
    };
    state.set_transform(vp);
    assert_eq!(state.transform(), vp);
}

#[test]
fn visible_nodes_respects_the_current_transform() {
    let mut state = FlowState::default();
    state.set_viewport_dimensions(100.0, 100.0);
    state
        .set_nodes(vec![
            Node::new("near", 10.0, 10.0).with_size(10.0, 10.0),
            Node::new("far", 1000.0, 1000.0).with_size(10.0, 10.0),
        ])
        .unwrap();

    let ids: Vec<&str> = state.visible_nodes().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, ["near"]);

    // Pan over to the far node.
    state.set_transform(Viewport {
        x: -950.0,
        y: -950.0,
        zoom: 1.0,
    });
    let ids: Vec<&str> = state.visible_nodes().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, ["far"]);
}

#[test]
fn corrupt_node_lists_are_rejected_without_installing_anything() {
    let mut state = FlowState::default();
    state.set_nodes(vec![Node::new("a", 1.0, 2.0)]).unwrap();

    let err = state.set_nodes(vec![Node::new("b", 0.0, 0.0).with_parent("ghost")]);
    assert!(err.is_err());

    // The previous consistent snapshot is still installed.
    assert_eq!(state.internals().position_absolute("a"), Some(point(1.0, 2.0)));
    assert!(!state.internals().contains("b"));
}
