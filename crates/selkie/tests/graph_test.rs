use selkie::graph::{
    Connection, add_edge, get_connected_edges, get_incomers, get_outgoers, update_edge,
};
use selkie::node::{Edge, Node};

fn diamond() -> (Vec<Node>, Vec<Edge>) {
    let nodes = vec![
        Node::new("a", 0.0, 0.0),
        Node::new("b", 0.0, 0.0),
        Node::new("c", 0.0, 0.0),
        Node::new("d", 0.0, 0.0),
    ];
    let edges = vec![
        Edge::new("ab", "a", "b"),
        Edge::new("ac", "a", "c"),
        Edge::new("bd", "b", "d"),
        Edge::new("cd", "c", "d"),
    ];
    (nodes, edges)
}

#[test]
fn incomers_and_outgoers_follow_edge_direction() {
    let (nodes, edges) = diamond();

    let incomers: Vec<&str> = get_incomers("d", &nodes, &edges)
        .iter()
        .map(|n| n.id.as_str())
        .collect();
    assert_eq!(incomers, ["b", "c"]);

    let outgoers: Vec<&str> = get_outgoers("a", &nodes, &edges)
        .iter()
        .map(|n| n.id.as_str())
        .collect();
    assert_eq!(outgoers, ["b", "c"]);

    assert!(get_incomers("a", &nodes, &edges).is_empty());
}

#[test]
fn connected_edges_touch_at_least_one_of_the_ids() {
    let (_, edges) = diamond();
    let connected: Vec<&str> = get_connected_edges(&["b".to_string()], &edges)
        .iter()
        .map(|e| e.id.as_str())
        .collect();
    assert_eq!(connected, ["ab", "bd"]);
}

#[test]
fn add_edge_skips_duplicates() {
    let edges = vec![Edge::new("ab", "a", "b")];
    let next = add_edge(Edge::new("ab2", "a", "b"), edges);
    assert_eq!(next.len(), 1);

    let next = add_edge(Edge::new("ba", "b", "a"), next);
    assert_eq!(next.len(), 2);
}

#[test]
fn update_edge_rewires_and_drops_the_old_edge() {
    let (_, edges) = diamond();
    let old = edges[0].clone();
    let next = update_edge(
        &old,
        Connection {
            source: "a".to_string(),
            target: "d".to_string(),
        },
        edges,
    );

    assert_eq!(next.len(), 4);
    assert!(!next.iter().any(|e| e.id == "ab"));
    let rewired = next.iter().find(|e| e.id == "a-d").unwrap();
    assert_eq!(rewired.source, "a");
    assert_eq!(rewired.target, "d");
}
