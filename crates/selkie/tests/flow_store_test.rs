use std::cell::RefCell;
use std::rc::Rc;

use selkie::geom::point;
use selkie::node::Node;
use selkie::viewport::Viewport;
use selkie::{FlowState, FlowStore};

#[test]
fn transform_subscription_fires_on_viewport_writes_only() {
    let mut store = FlowStore::new(FlowState::default());

    let transforms: Rc<RefCell<Vec<Viewport>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = transforms.clone();
    store.subscribe(
        |s: &FlowState| s.transform(),
        move |vp| sink.borrow_mut().push(*vp),
    );

    // A node write does not touch the transform slice.
    store.update(|s| {
        s.set_nodes(vec![Node::new("a", 0.0, 0.0)]).unwrap();
    });
    assert!(transforms.borrow().is_empty());

    store.update(|s| {
        s.set_transform(Viewport {
            x: 5.0,
            y: 5.0,
            zoom: 1.2,
        })
    });
    assert_eq!(transforms.borrow().len(), 1);
    assert_eq!(transforms.borrow()[0].zoom, 1.2);
}

#[test]
fn node_count_subscription_tracks_rebuilds() {
    let mut store = FlowStore::new(FlowState::default());

    let counts: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = counts.clone();
    store.subscribe(
        |s: &FlowState| s.internals().len(),
        move |n| sink.borrow_mut().push(*n),
    );

    store.update(|s| {
        s.set_nodes(vec![Node::new("a", 1.0, 1.0), Node::new("b", 2.0, 2.0)])
            .unwrap();
    });
    store.update(|s| {
        s.set_nodes(vec![Node::new("a", 1.0, 1.0)]).unwrap();
    });

    assert_eq!(counts.borrow().as_slice(), [2, 1]);
    assert_eq!(
        store.get().internals().position_absolute("a"),
        Some(point(1.0, 1.0))
    );
}
