use relgraph::{Direction, Graph, GraphError, GraphOptions};

#[test]
fn undirected_edges_are_symmetric() {
    let mut g: Graph<&str> = Graph::new(GraphOptions { directed: false });

    assert!(g.add_edge("b", "a"));
    assert!(!g.add_edge("a", "b"));

    assert!(g.contains_edge(&"a", &"b"));
    assert!(g.contains_edge(&"b", &"a"));
    assert_eq!(g.edge_count(), 1);
}

#[test]
fn undirected_degrees_count_each_incident_edge() {
    let mut g: Graph<&str> = Graph::undirected();
    g.add_edge("a", "b");
    g.add_edge("b", "c");

    assert_eq!(g.out_degree(&"b"), 2);
    assert_eq!(g.in_degree(&"b"), 2);
    assert_eq!(g.out_degree(&"a"), 1);
    assert_eq!(g.in_degree(&"c"), 1);
}

#[test]
fn undirected_successors_predecessors_and_neighbors_are_the_same() {
    let mut g: Graph<&str> = Graph::undirected();
    g.add_edge("a", "b");
    g.add_edge("b", "c");

    let mut succ = g.successors(&"b");
    let mut pred = g.predecessors(&"b");
    let mut neigh = g.adjacent_to(&"b", Direction::Both);
    succ.sort();
    pred.sort();
    neigh.sort();

    assert_eq!(succ, vec![&"a", &"c"]);
    assert_eq!(pred, vec![&"a", &"c"]);
    assert_eq!(neigh, vec![&"a", &"c"]);
}

#[test]
fn undirected_edges_enumerate_each_pair_once() {
    let mut g: Graph<&str> = Graph::undirected();
    g.add_edge("a", "b");
    g.add_edge("c", "b");
    g.add_edge("c", "c");

    let edges: Vec<(&&str, &&str)> = g.edges().iter().collect();
    assert_eq!(edges.len(), 3);
    assert!(
        edges
            .iter()
            .any(|&(v, w)| (*v == "a" && *w == "b") || (*v == "b" && *w == "a"))
    );
    assert!(
        edges
            .iter()
            .any(|&(v, w)| (*v == "b" && *w == "c") || (*v == "c" && *w == "b"))
    );
    assert!(edges.iter().any(|&(v, w)| *v == "c" && *w == "c"));
}

#[test]
fn undirected_remove_edge_works_in_either_orientation() {
    let mut g: Graph<&str> = Graph::undirected();
    g.add_edge("a", "b");

    assert!(g.remove_edge(&"b", &"a"));
    assert!(!g.contains_edge(&"a", &"b"));
    assert!(g.contains_vertex(&"a"));
    assert!(g.contains_vertex(&"b"));
    assert_eq!(g.edge_count(), 0);
}

#[test]
fn undirected_cycles_need_a_closed_loop() {
    let mut g: Graph<u32> = Graph::undirected();
    g.extend([(1, 2), (2, 3), (3, 4)]);
    assert!(!g.is_cyclic());

    g.add_edge(4, 2);
    assert!(g.is_cyclic());

    let mut h: Graph<u32> = Graph::undirected();
    h.add_edge(5, 5);
    assert!(h.is_cyclic());
}

#[test]
fn undirected_graphs_have_no_topological_order() {
    let mut g: Graph<u32> = Graph::undirected();
    g.add_edge(1, 2);

    let out: Vec<_> = g.topological_order().collect();
    assert_eq!(
        out,
        vec![Err(GraphError::Unsupported {
            operation: "topological order of an undirected graph"
        })]
    );
}

#[test]
fn undirected_dot_uses_plain_edges() {
    let mut g: Graph<&str> = Graph::undirected();
    g.add_edge("b", "a");
    g.add_vertex("c");

    assert_eq!(
        g.to_dot(),
        "graph {\n  v0 -- { v1 }\n  v2\n\n  v0 [label=\"b\"]\n  v1 [label=\"a\"]\n  v2 [label=\"c\"]\n}"
    );
}

#[test]
fn transitive_reduction_keeps_undirected_graphs_connected() {
    let mut g: Graph<&str> = Graph::undirected();
    g.extend([("a", "b"), ("b", "c"), ("a", "c"), ("c", "d")]);

    assert_eq!(g.reduce_transitions(), 1);
    assert_eq!(g.edge_count(), 3);
    assert!(g.is_connected());
    assert!(g.contains_edge(&"d", &"c"));
    for (x, y) in [("a", "b"), ("a", "c"), ("b", "c"), ("a", "d")] {
        assert!(g.has_path(&x, &y));
    }

    // A tree has nothing left to remove.
    assert_eq!(g.reduce_transitions(), 0);
    assert_eq!(g.edge_count(), 3);
}
