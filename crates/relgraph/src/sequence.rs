//! Cycle-tolerant, stable dependency ordering of plain sequences.
//!
//! Unlike [`Graph::topological_order`], these never fail: items caught in a cycle keep their
//! input order relative to each other. An item moves ahead of another only when it is a
//! (transitive) dependency of it and not the other way round. That relation is only a partial
//! order, so the sort is a stable selection sort instead of a comparison sort.

use crate::comparer::{DefaultComparer, VertexComparer};
use crate::graph::{Graph, GraphOptions, IdSet, VertexId};
use std::hash::Hash;

pub trait TopologicalSortExt: Iterator + Sized {
    /// Orders items so that each comes after the items whose keys it lists in
    /// `dependencies`.
    fn order_topologically_by<K, F, D, I>(self, key: F, dependencies: D) -> Vec<Self::Item>
    where
        K: Eq + Hash,
        F: FnMut(&Self::Item) -> K,
        D: FnMut(&Self::Item) -> I,
        I: IntoIterator<Item = K>,
    {
        self.order_topologically_by_with(key, dependencies, DefaultComparer)
    }

    /// Like [`order_topologically_by`](Self::order_topologically_by), with keys matched by
    /// `comparer`.
    fn order_topologically_by_with<K, F, D, I, C>(
        self,
        mut key: F,
        mut dependencies: D,
        comparer: C,
    ) -> Vec<Self::Item>
    where
        C: VertexComparer<K>,
        F: FnMut(&Self::Item) -> K,
        D: FnMut(&Self::Item) -> I,
        I: IntoIterator<Item = K>,
    {
        let items: Vec<Self::Item> = self.collect();
        let mut graph = Graph::with_comparer(GraphOptions::directed(), comparer);
        let mut ids = Vec::with_capacity(items.len());
        for item in &items {
            let (id, _) = graph.intern(key(item));
            ids.push(id);
        }
        for (item, &dependent) in items.iter().zip(&ids) {
            for dependency in dependencies(item) {
                let (dependency, _) = graph.intern(dependency);
                graph.add_edge_ids(dependency, dependent);
            }
        }
        stable_order(items, &ids, &graph)
    }

    /// Items are their own keys.
    fn order_topologically<D, I>(self, dependencies: D) -> Vec<Self::Item>
    where
        Self::Item: Clone + Eq + Hash,
        D: FnMut(&Self::Item) -> I,
        I: IntoIterator<Item = Self::Item>,
    {
        self.order_topologically_by(|item: &Self::Item| item.clone(), dependencies)
    }

    /// Dependencies given as a predicate: `depends_on(a, b)` means the item keyed `a` must
    /// come after the item keyed `b`. Evaluated once per ordered pair of distinct keys.
    fn order_topologically_by_predicate<K, F, P>(
        self,
        mut key: F,
        mut depends_on: P,
    ) -> Vec<Self::Item>
    where
        K: Eq + Hash,
        F: FnMut(&Self::Item) -> K,
        P: FnMut(&K, &K) -> bool,
    {
        let items: Vec<Self::Item> = self.collect();
        let mut graph: Graph<K> = Graph::directed();
        let ids: Vec<VertexId> = items.iter().map(|item| graph.intern(key(item)).0).collect();

        let keys: Vec<VertexId> = graph.vertex_ids().collect();
        let mut edges = Vec::new();
        for &a in &keys {
            for &b in &keys {
                if a != b && depends_on(graph.vertex_at(a), graph.vertex_at(b)) {
                    edges.push((b, a));
                }
            }
        }
        for (dependency, dependent) in edges {
            graph.add_edge_ids(dependency, dependent);
        }
        stable_order(items, &ids, &graph)
    }
}

impl<T: Iterator> TopologicalSortExt for T {}

/// `graph` has an edge from every dependency to its dependents; `ids[i]` is the vertex of
/// `items[i]`.
fn stable_order<T, K, C>(items: Vec<T>, ids: &[VertexId], graph: &Graph<K, C>) -> Vec<T> {
    let mut reachable: Vec<Option<IdSet>> = vec![None; graph.id_bound()];
    for &id in ids {
        if reachable[id].is_none() {
            reachable[id] = Some(graph.reachable_ids(id));
        }
    }
    let path = |a: VertexId, b: VertexId| reachable[a].as_ref().is_some_and(|r| r.contains(&b));
    let precedes = |x: usize, y: usize| {
        let (a, b) = (ids[x], ids[y]);
        a != b && path(a, b) && !path(b, a)
    };

    let n = items.len();
    let mut order: Vec<usize> = (0..n).collect();
    for pos in 0..n {
        // First remaining item that nothing else remaining must precede. Strict partial
        // orders always have one.
        let pick = (pos..n)
            .find(|&j| !(pos..n).any(|k| k != j && precedes(order[k], order[j])))
            .unwrap_or(pos);
        if pick != pos {
            let moved = order.remove(pick);
            order.insert(pos, moved);
        }
    }
    tracing::trace!(items = n, keys = graph.id_bound(), "stable topological sort");

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    order.into_iter().filter_map(|i| slots[i].take()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_dependencies_forward_and_keeps_the_rest_in_place() {
        let out = ["app", "misc", "lib", "core"]
            .into_iter()
            .order_topologically(|s| match *s {
                "app" => vec!["lib"],
                "lib" => vec!["core"],
                _ => vec![],
            });
        assert_eq!(out, vec!["misc", "core", "lib", "app"]);
    }

    #[test]
    fn duplicate_keys_keep_their_positions() {
        let out = [("b", 1), ("a", 2), ("b", 3)].into_iter().order_topologically_by(
            |&(k, _)| k,
            |&(k, _)| if k == "b" { vec!["a"] } else { vec![] },
        );
        assert_eq!(out, vec![("a", 2), ("b", 1), ("b", 3)]);
    }
}
