use relgraph::{AsciiCaseInsensitive, TopologicalSortExt};

/// Dependencies as `(dependent, dependency)` pairs.
fn deps_of<'a>(
    edges: &'a [(&'static str, &'static str)],
) -> impl FnMut(&&str) -> Vec<&'static str> + 'a {
    move |item| {
        edges
            .iter()
            .filter(|(dependent, _)| dependent == item)
            .map(|&(_, dependency)| dependency)
            .collect()
    }
}

#[test]
fn already_ordered_input_is_unchanged() {
    // A depends on B, B depends on C.
    let edges = [("A", "B"), ("B", "C")];
    let out = ["C", "B", "A"].into_iter().order_topologically(deps_of(&edges));
    assert_eq!(out, vec!["C", "B", "A"]);
}

#[test]
fn dependencies_are_moved_ahead() {
    let edges = [("A", "B"), ("B", "C")];
    let out = ["A", "B", "C"].into_iter().order_topologically(deps_of(&edges));
    assert_eq!(out, vec!["C", "B", "A"]);
}

#[test]
fn cycles_fall_back_to_input_order() {
    let edges = [("A", "B"), ("B", "A")];
    let out = ["A", "B"].into_iter().order_topologically(deps_of(&edges));
    assert_eq!(out, vec!["A", "B"]);
    let out = ["B", "A"].into_iter().order_topologically(deps_of(&edges));
    assert_eq!(out, vec!["B", "A"]);
}

#[test]
fn cycle_members_still_follow_their_outside_dependencies() {
    // A <-> B, and both depend on C.
    let edges = [("A", "B"), ("B", "A"), ("A", "C"), ("B", "C")];
    let out = ["B", "A", "C"].into_iter().order_topologically(deps_of(&edges));
    assert_eq!(out, vec!["C", "B", "A"]);
}

#[test]
fn keyed_sort_moves_whole_items() {
    #[derive(Debug, Clone, PartialEq)]
    struct Step {
        name: &'static str,
        after: Vec<&'static str>,
    }
    let step = |name, after: &[&'static str]| Step {
        name,
        after: after.to_vec(),
    };

    let steps = vec![
        step("deploy", &["build", "test"]),
        step("test", &["build"]),
        step("build", &["fetch"]),
        step("lint", &[]),
    ];
    let names: Vec<&str> = steps
        .into_iter()
        .order_topologically_by(|s| s.name, |s| s.after.clone())
        .into_iter()
        .map(|s| s.name)
        .collect();
    // `fetch` is only referenced, never an item, so it does not show up.
    assert_eq!(names, vec!["build", "test", "deploy", "lint"]);
}

#[test]
fn custom_comparer_matches_keys() {
    let out = ["App", "core"].into_iter().order_topologically_by_with(
        |s| *s,
        |s| if *s == "App" { vec!["CORE"] } else { vec![] },
        AsciiCaseInsensitive,
    );
    assert_eq!(out, vec!["core", "App"]);
}

#[test]
fn predicate_dependencies() {
    // Every number depends on its proper divisors.
    let out = [12u32, 4, 7, 2, 6]
        .into_iter()
        .order_topologically_by_predicate(|n| *n, |a, b| a != b && a % b == 0);
    assert_eq!(out, vec![7, 2, 4, 6, 12]);
}

#[test]
fn empty_input() {
    let out = std::iter::empty::<u32>().order_topologically(|_| Vec::new());
    assert!(out.is_empty());
}
