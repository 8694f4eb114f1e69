use super::store::{IdSet, VertexId, VertexStore};
use super::{Graph, GraphOptions};
use crate::comparer::{DefaultComparer, VertexComparer};

/// Configures how a [`Graph`] is created.
///
/// `build` returns an empty graph. `from_predicate` and `from_adjacency` derive the edges of
/// a vertex collection; both honour `reflexive_reduction` (no self-loops are created) and
/// `exclude_isolated` (vertices left without any incident edge are dropped).
#[derive(Debug, Clone)]
pub struct GraphBuilder<C = DefaultComparer> {
    options: GraphOptions,
    comparer: C,
    reflexive_reduction: bool,
    exclude_isolated: bool,
}

impl GraphBuilder<DefaultComparer> {
    pub fn new() -> Self {
        Self {
            options: GraphOptions::default(),
            comparer: DefaultComparer,
            reflexive_reduction: false,
            exclude_isolated: false,
        }
    }
}

impl Default for GraphBuilder<DefaultComparer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> GraphBuilder<C> {
    pub fn directed(mut self) -> Self {
        self.options = GraphOptions::directed();
        self
    }

    pub fn undirected(mut self) -> Self {
        self.options = GraphOptions::undirected();
        self
    }

    pub fn options(mut self, options: GraphOptions) -> Self {
        self.options = options;
        self
    }

    pub fn comparer<C2>(self, comparer: C2) -> GraphBuilder<C2> {
        GraphBuilder {
            options: self.options,
            comparer,
            reflexive_reduction: self.reflexive_reduction,
            exclude_isolated: self.exclude_isolated,
        }
    }

    pub fn reflexive_reduction(mut self, enabled: bool) -> Self {
        self.reflexive_reduction = enabled;
        self
    }

    pub fn exclude_isolated(mut self, enabled: bool) -> Self {
        self.exclude_isolated = enabled;
        self
    }

    pub fn build<V>(self) -> Graph<V, C> {
        Graph::with_comparer(self.options, self.comparer)
    }

    /// Adds every vertex, then an edge `a -> b` for each ordered pair where `adjacent(a, b)`
    /// holds. Duplicate vertices under the comparer are collapsed to the first occurrence.
    pub fn from_predicate<V, I, P>(self, vertices: I, mut adjacent: P) -> Graph<V, C>
    where
        C: VertexComparer<V>,
        I: IntoIterator<Item = V>,
        P: FnMut(&V, &V) -> bool,
    {
        let mut pool: VertexStore<V> = VertexStore::default();
        for v in vertices {
            pool.insert(&self.comparer, v);
        }

        let ids: Vec<VertexId> = pool.ids().collect();
        let mut pairs = Vec::new();
        for &a in &ids {
            for &b in &ids {
                if a == b && self.reflexive_reduction {
                    continue;
                }
                if adjacent(pool.vertex(a), pool.vertex(b)) {
                    pairs.push((a, b));
                }
            }
        }
        self.finish(pool, pairs)
    }

    /// Adds every vertex, then an edge `v -> w` for each `w` that `adjacent(v)` yields.
    /// Yielded vertices that are not yet members are added; `adjacent` is only called for the
    /// input vertices.
    pub fn from_adjacency<V, I, F, A>(self, vertices: I, mut adjacent: F) -> Graph<V, C>
    where
        C: VertexComparer<V>,
        I: IntoIterator<Item = V>,
        F: FnMut(&V) -> A,
        A: IntoIterator<Item = V>,
    {
        let mut pool: VertexStore<V> = VertexStore::default();
        for v in vertices {
            pool.insert(&self.comparer, v);
        }

        let seeds: Vec<VertexId> = pool.ids().collect();
        let mut pairs = Vec::new();
        for from in seeds {
            let targets: Vec<V> = adjacent(pool.vertex(from)).into_iter().collect();
            for target in targets {
                let (to, _) = pool.insert(&self.comparer, target);
                if from == to && self.reflexive_reduction {
                    continue;
                }
                pairs.push((from, to));
            }
        }
        self.finish(pool, pairs)
    }

    fn finish<V>(self, mut pool: VertexStore<V>, pairs: Vec<(VertexId, VertexId)>) -> Graph<V, C>
    where
        C: VertexComparer<V>,
    {
        let exclude_isolated = self.exclude_isolated;
        let mut graph = Graph::with_comparer(self.options, self.comparer);

        let touched: IdSet = pairs.iter().flat_map(|&(a, b)| [a, b]).collect();
        let mut mapping: Vec<Option<VertexId>> = vec![None; pool.capacity()];
        let ids: Vec<VertexId> = pool.ids().collect();
        for id in ids {
            if exclude_isolated && !touched.contains(&id) {
                continue;
            }
            if let Some(entry) = pool.remove_slot(id) {
                let (copied, _) = graph.intern(entry.vertex);
                mapping[id] = Some(copied);
            }
        }
        if graph.store.live_count() > 0 {
            graph.bump_version();
        }

        for (a, b) in pairs {
            if let (Some(x), Some(y)) = (mapping[a], mapping[b]) {
                graph.add_edge_ids(x, y);
            }
        }
        tracing::trace!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "built graph"
        );
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparer::AsciiCaseInsensitive;

    #[test]
    fn predicate_pairs_are_ordered() {
        let g = GraphBuilder::new()
            .reflexive_reduction(true)
            .from_predicate([1u32, 2, 3, 4, 6], |a, b| b % a == 0);
        assert!(g.contains_edge(&1, &6));
        assert!(g.contains_edge(&3, &6));
        assert!(!g.contains_edge(&6, &3));
        assert!(!g.contains_edge(&2, &2));
        assert_eq!(g.edge_count(), 7);
    }

    #[test]
    fn exclude_isolated_drops_unconnected_vertices() {
        let g = GraphBuilder::new()
            .reflexive_reduction(true)
            .exclude_isolated(true)
            .from_predicate([2u32, 3, 4, 7], |a, b| b % a == 0);
        assert!(g.contains_vertex(&2));
        assert!(g.contains_vertex(&4));
        assert!(!g.contains_vertex(&3));
        assert!(!g.contains_vertex(&7));
        assert_eq!(g.vertex_count(), 2);
    }

    #[test]
    fn adjacency_uses_the_builder_comparer() {
        let g = GraphBuilder::new()
            .comparer(AsciiCaseInsensitive)
            .from_adjacency(["app", "Lib"], |v: &&str| {
                if v.eq_ignore_ascii_case("app") {
                    vec!["LIB", "core"]
                } else {
                    vec![]
                }
            });
        assert_eq!(g.vertex_count(), 3);
        assert!(g.contains_edge(&"APP", &"lib"));
        assert_eq!(g.get_vertex(&"lib"), Some(&"Lib"));
        assert!(g.contains_edge(&"app", &"core"));
    }
}
