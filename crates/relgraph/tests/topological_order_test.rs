use relgraph::{Graph, GraphError, Result};
use std::collections::HashMap;

fn ordered<'g>(
    it: impl Iterator<Item = Result<&'g &'static str>>,
) -> Result<Vec<&'static str>> {
    it.map(|r| r.copied()).collect()
}

#[test]
fn topological_order_respects_every_edge() {
    let mut g: Graph<&str> = Graph::directed();
    g.extend([
        ("shirt", "tie"),
        ("tie", "jacket"),
        ("trousers", "shoes"),
        ("trousers", "belt"),
        ("belt", "jacket"),
        ("shirt", "belt"),
        ("socks", "shoes"),
    ]);
    g.add_vertex("watch");

    let order = ordered(g.topological_order()).unwrap();
    assert_eq!(order.len(), g.vertex_count());
    let pos = |v: &str| order.iter().position(|x| *x == v).unwrap();
    for (a, b) in g.edges() {
        assert!(pos(*a) < pos(*b), "{a} must come before {b}");
    }
}

#[test]
fn ties_keep_insertion_order() {
    let mut g: Graph<&str> = Graph::directed();
    for v in ["d", "b", "c", "a"] {
        g.add_vertex(v);
    }
    g.add_edge("c", "a");

    assert_eq!(ordered(g.topological_order()).unwrap(), vec!["d", "b", "c", "a"]);
}

#[test]
fn cycles_fail_with_circular_dependency() {
    let mut g: Graph<&str> = Graph::directed();
    g.extend([("A", "B"), ("B", "C"), ("C", "A")]);
    g.add_edge("root", "A");

    assert!(g.is_cyclic());
    let out: Vec<Result<&&str>> = g.topological_order().collect();
    assert_eq!(out.len(), 2);
    assert_eq!(out[0], Ok(&"root"));
    assert_eq!(
        out[1],
        Err(GraphError::CircularDependency { remaining_edges: 3 })
    );
    assert!(ordered(g.topological_order()).unwrap_err().is_circular_dependency());
}

#[test]
fn every_call_starts_over() {
    let mut g: Graph<u32> = Graph::directed();
    g.extend([(1, 2), (2, 3)]);

    let mut first = g.topological_order();
    assert_eq!(first.next(), Some(Ok(&1)));
    let second: Vec<u32> = g.topological_order().map(|r| *r.unwrap()).collect();
    assert_eq!(second, vec![1, 2, 3]);
    assert_eq!(first.next(), Some(Ok(&2)));
}

#[test]
fn keyed_order_breaks_ties_by_key() {
    let mut g: Graph<&str> = Graph::directed();
    for v in ["pear", "fig", "apple", "kiwi", "banana"] {
        g.add_vertex(v);
    }
    g.add_edge("pear", "apple");

    let by_name = ordered(g.topological_order_by(|v| *v).iter()).unwrap();
    assert_eq!(by_name, vec!["banana", "fig", "kiwi", "pear", "apple"]);

    let by_name_desc = ordered(g.topological_order_by_descending(|v| *v).iter()).unwrap();
    assert_eq!(by_name_desc, vec!["pear", "kiwi", "fig", "banana", "apple"]);
}

#[test]
fn then_by_only_matters_on_equal_keys() {
    let mut g: Graph<&str> = Graph::directed();
    for v in ["ccc", "bb", "aa", "d", "eee"] {
        g.add_vertex(v);
    }
    g.add_edge("d", "aa");

    let order = g
        .topological_order_by(|v| v.len())
        .then_by_descending(|v| *v);
    let first = ordered(order.iter()).unwrap();
    assert_eq!(first, vec!["d", "bb", "aa", "eee", "ccc"]);

    // The builder can be iterated again.
    assert_eq!(ordered(order.iter()).unwrap(), first);
}

#[test]
fn key_functions_can_borrow_local_state() {
    let mut g: Graph<&str> = Graph::directed();
    for v in ["build", "test", "lint", "docs"] {
        g.add_vertex(v);
    }
    g.add_edge("build", "test");

    let priority: HashMap<&str, u32> = [("lint", 0), ("docs", 1), ("build", 2), ("test", 0)]
        .into_iter()
        .collect();
    let order = ordered(g.topological_order_by(|v| priority[v]).iter()).unwrap();
    assert_eq!(order, vec!["lint", "docs", "build", "test"]);
}

#[test]
fn custom_key_comparison() {
    let mut g: Graph<i32> = Graph::directed();
    for v in [3, -1, 2, -4] {
        g.add_vertex(v);
    }

    let order: Vec<i32> = g
        .topological_order_by_with(|v: &i32| *v, |a: &i32, b: &i32| a.abs().cmp(&b.abs()))
        .into_iter()
        .map(|r| *r.unwrap())
        .collect();
    assert_eq!(order, vec![-1, 2, 3, -4]);
}

#[test]
fn keyed_order_still_reports_cycles() {
    let mut g: Graph<u32> = Graph::directed();
    g.extend([(1, 2), (2, 1)]);

    let out: Vec<_> = g.topological_order_by(|v: &u32| *v).into_iter().collect();
    assert_eq!(
        out,
        vec![Err(GraphError::CircularDependency { remaining_edges: 2 })]
    );
}
