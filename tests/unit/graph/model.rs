use super::*;

fn chain() -> Graph {
    build_graph(
        &[
            NodeSpec::at("A", 0.0, 0.0),
            NodeSpec::at("B", 50.0, 0.0),
            NodeSpec::at("C", 100.0, 0.0),
        ],
        &[
            EdgeSpec::undirected("A", "B", 1.0),
            EdgeSpec::directed("B", "C", 2.5),
        ],
    )
    .unwrap()
}

#[test]
fn ids_follow_input_order() {
    let g = chain();
    assert_eq!(g.node_count(), 3);
    assert_eq!(g.node_id("A"), Some(NodeId(0)));
    assert_eq!(g.node_id("C"), Some(NodeId(2)));
    assert_eq!(g.node_id("Z"), None);
    assert_eq!(g.name(NodeId(1)), "B");
}

#[test]
fn undirected_edges_are_symmetric_directed_are_not() {
    let g = chain();
    assert_eq!(g.edge_weight(NodeId(0), NodeId(1)), Some(1.0));
    assert_eq!(g.edge_weight(NodeId(1), NodeId(0)), Some(1.0));
    assert_eq!(g.edge_weight(NodeId(1), NodeId(2)), Some(2.5));
    assert_eq!(g.edge_weight(NodeId(2), NodeId(1)), None);
    assert_eq!(g.edge_weight(NodeId(0), NodeId(2)), None);
}

#[test]
fn neighbors_are_sorted_by_id() {
    let g = build_graph(
        &[
            NodeSpec::named("hub"),
            NodeSpec::named("a"),
            NodeSpec::named("b"),
            NodeSpec::named("c"),
        ],
        &[
            EdgeSpec::undirected("hub", "c", 1.0),
            EdgeSpec::undirected("hub", "a", 1.0),
            EdgeSpec::undirected("b", "hub", 1.0),
        ],
    )
    .unwrap();
    let ids: Vec<NodeId> = g.neighbors(NodeId(0)).iter().map(|a| a.node).collect();
    assert_eq!(ids, vec![NodeId(1), NodeId(2), NodeId(3)]);
    assert!(g.neighbors(NodeId(9)).is_empty());
}

#[test]
fn missing_positions_fall_back_to_circle_layout() {
    let g = build_graph(
        &[NodeSpec::at("A", 500.0, 500.0), NodeSpec::named("B")],
        &[],
    )
    .unwrap();
    assert_eq!(
        g.node(NodeId(0)).unwrap().position,
        crate::graph::layout::circle_positions(2)[0]
    );
}

#[test]
fn duplicate_node_names_are_rejected() {
    let err = build_graph(&[NodeSpec::named("A"), NodeSpec::named("A")], &[]).unwrap_err();
    assert!(matches!(err, ReelError::MalformedGraph(_)));
    assert!(err.to_string().contains("duplicate node id 'A'"));
}

#[test]
fn unknown_endpoints_are_rejected() {
    let err = build_graph(
        &[NodeSpec::named("A")],
        &[EdgeSpec::undirected("A", "B", 1.0)],
    )
    .unwrap_err();
    assert!(err.to_string().contains("unknown node id 'B'"));
}

#[test]
fn self_loops_and_bad_weights_are_rejected() {
    let nodes = [NodeSpec::named("A"), NodeSpec::named("B")];
    for edge in [
        EdgeSpec::undirected("A", "A", 1.0),
        EdgeSpec::undirected("A", "B", -1.0),
        EdgeSpec::undirected("A", "B", f64::NAN),
        EdgeSpec::undirected("A", "B", f64::INFINITY),
    ] {
        assert!(matches!(
            build_graph(&nodes, &[edge]).unwrap_err(),
            ReelError::MalformedGraph(_)
        ));
    }
}

#[test]
fn duplicate_edges_are_rejected_but_opposite_arcs_are_not() {
    let nodes = [NodeSpec::named("A"), NodeSpec::named("B")];
    assert!(
        build_graph(
            &nodes,
            &[
                EdgeSpec::undirected("A", "B", 1.0),
                EdgeSpec::undirected("B", "A", 2.0),
            ],
        )
        .is_err()
    );
    assert!(
        build_graph(
            &nodes,
            &[
                EdgeSpec::directed("A", "B", 1.0),
                EdgeSpec::directed("B", "A", 2.0),
            ],
        )
        .is_ok()
    );
}

#[test]
fn empty_graph_is_rejected() {
    assert!(build_graph(&[], &[]).is_err());
}

#[test]
fn bounds_and_path_cost() {
    let g = chain();
    assert_eq!(g.bounds(), Rect::new(0.0, 0.0, 100.0, 0.0));
    assert_eq!(
        g.path_cost(&[NodeId(0), NodeId(1), NodeId(2)]),
        Some(3.5)
    );
    assert_eq!(g.path_cost(&[NodeId(2), NodeId(1)]), None);
    assert_eq!(g.path_cost(&[NodeId(0)]), Some(0.0));
}

#[test]
fn arcs_are_stored_in_the_directed_graph() {
    let g = chain();
    let pg = g.as_petgraph();
    // A-B undirected (two arcs) plus B->C.
    assert_eq!(pg.node_count(), 3);
    assert_eq!(pg.edge_count(), 3);
    assert_eq!(g.edges().len(), 2);
    assert_eq!(pg[petgraph::graph::NodeIndex::new(2)].name, "C");

    let names: Vec<&str> = g.nodes().map(|n| n.name.as_str()).collect();
    assert_eq!(names, ["A", "B", "C"]);
}
