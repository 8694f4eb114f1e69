//! Derived graphs and structural comparisons.
//!
//! Derived graphs are fresh instances. They inherit the source's options and comparer and
//! never share storage with it.

use super::Graph;
use super::store::{IdSet, VertexId};
use crate::comparer::VertexComparer;
use std::borrow::Borrow;

impl<V, C> Graph<V, C>
where
    V: Clone,
    C: VertexComparer<V> + Clone,
{
    /// Copies the vertices accepted by `keep` into an empty graph, in insertion order. The
    /// returned table maps source ids to ids in the copy.
    fn copy_vertices(
        &self,
        mut keep: impl FnMut(VertexId) -> bool,
    ) -> (Self, Vec<Option<VertexId>>) {
        let mut out = self.empty_like();
        let mut mapping = vec![None; self.id_bound()];
        for (id, entry) in self.store.entries() {
            if keep(id) {
                let (copied, _) = out.intern(entry.vertex.clone());
                mapping[id] = Some(copied);
            }
        }
        if out.store.live_count() > 0 {
            out.bump_version();
        }
        (out, mapping)
    }

    /// Copies the edges accepted by `keep` whose endpoints were both copied.
    fn copy_edges(
        &self,
        out: &mut Self,
        mapping: &[Option<VertexId>],
        reversed: bool,
        mut keep: impl FnMut(VertexId, VertexId) -> bool,
    ) {
        for (a, b) in self.edge_ids() {
            if !keep(a, b) {
                continue;
            }
            let (Some(x), Some(y)) = (mapping[a], mapping[b]) else {
                continue;
            };
            if reversed {
                out.add_edge_ids(y, x);
            } else {
                out.add_edge_ids(x, y);
            }
        }
    }

    /// The graph with every edge reversed. Isolated vertices are kept.
    pub fn transposition(&self) -> Self {
        let (mut out, mapping) = self.copy_vertices(|_| true);
        self.copy_edges(&mut out, &mapping, true, |_, _| true);
        out
    }

    /// A copy without self-loops.
    pub fn reflexive_reduction(&self) -> Self {
        let mut out = self.clone();
        out.reduce_reflexes();
        out
    }

    /// A copy without edges implied by longer paths.
    pub fn transitive_reduction(&self) -> Self {
        let mut out = self.clone();
        out.reduce_transitions();
        out
    }

    /// The members of `vertices` and every edge between two of them. Non-members are ignored.
    pub fn vertex_induced_subgraph<I>(&self, vertices: I) -> Self
    where
        I: IntoIterator,
        I::Item: Borrow<V>,
    {
        let (keep, _) = self.resolve_vertices(vertices);
        let (mut out, mapping) = self.copy_vertices(|id| keep.contains(&id));
        self.copy_edges(&mut out, &mapping, false, |_, _| true);
        out
    }

    /// The edges of `edges` that exist in this graph, together with their endpoints.
    pub fn edge_induced_subgraph<I, A, B>(&self, edges: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: Borrow<V>,
        B: Borrow<V>,
    {
        let (pairs, _) = self.resolve_edges(edges);
        let endpoints: IdSet = pairs.iter().flat_map(|&(a, b)| [a, b]).collect();
        let (mut out, mapping) = self.copy_vertices(|id| endpoints.contains(&id));
        self.copy_edges(&mut out, &mapping, false, |a, b| pairs.contains(&(a, b)));
        out
    }
}

impl<V, C> Graph<V, C>
where
    C: VertexComparer<V>,
{
    /// Removes every self-loop in place and returns how many were removed.
    pub fn reduce_reflexes(&mut self) -> usize {
        self.relations.invalidate();
        let loops: Vec<VertexId> = self
            .vertex_ids()
            .filter(|&id| self.has_edge_ids(id, id))
            .collect();
        for &id in &loops {
            self.remove_edge_ids(id, id);
        }
        loops.len()
    }

    /// Removes, in place, every edge `a -> b` for which another path from `a` to `b` exists,
    /// and returns how many were removed. Self-loops are left to
    /// [`reduce_reflexes`](Self::reduce_reflexes).
    ///
    /// On directed graphs redundancy is decided against the edges present before the call,
    /// so the result does not depend on scan order. On undirected graphs every cycle makes
    /// all of its edges look redundant, so each candidate is checked again against the edges
    /// still present and removed only while another path survives. Connectivity is kept and
    /// the result is a spanning forest whose shape follows edge order.
    pub fn reduce_transitions(&mut self) -> usize {
        self.relations.invalidate();
        let candidates: Vec<(VertexId, VertexId)> = self
            .edge_ids()
            .filter(|&(a, b)| a != b && self.has_transitive_path_ids(a, b))
            .collect();
        let directed = self.is_directed();
        let mut removed = 0usize;
        for (a, b) in candidates {
            if !directed && !self.has_transitive_path_ids(a, b) {
                continue;
            }
            if self.remove_edge_ids(a, b) {
                removed += 1;
            }
        }
        tracing::debug!(removed, directed, "transitive reduction");
        removed
    }

    fn vertices_within<C2>(&self, other: &Graph<V, C2>) -> bool
    where
        C2: VertexComparer<V>,
    {
        self.store
            .entries()
            .all(|(_, e)| other.contains_vertex(&e.vertex))
    }

    fn edges_within<C2>(&self, other: &Graph<V, C2>) -> bool
    where
        C2: VertexComparer<V>,
    {
        self.edge_ids()
            .all(|(a, b)| other.contains_edge(self.vertex_at(a), self.vertex_at(b)))
    }

    /// Same directedness, same vertex set and same edge set. Insertion order is irrelevant.
    pub fn graph_equals<C2>(&self, other: &Graph<V, C2>) -> bool
    where
        C2: VertexComparer<V>,
    {
        self.is_directed() == other.is_directed()
            && self.vertex_count() == other.vertex_count()
            && self.edge_count() == other.edge_count()
            && self.is_subgraph_of(other)
    }

    /// Every vertex and every edge of this graph is also in `other`.
    pub fn is_subgraph_of<C2>(&self, other: &Graph<V, C2>) -> bool
    where
        C2: VertexComparer<V>,
    {
        self.vertices_within(other) && self.edges_within(other)
    }

    pub fn is_proper_subgraph_of<C2>(&self, other: &Graph<V, C2>) -> bool
    where
        C2: VertexComparer<V>,
    {
        self.is_subgraph_of(other)
            && (self.vertex_count() < other.vertex_count()
                || self.edge_count() < other.edge_count())
    }

    pub fn is_supergraph_of<C2>(&self, other: &Graph<V, C2>) -> bool
    where
        C2: VertexComparer<V>,
    {
        other.is_subgraph_of(self)
    }

    pub fn is_proper_supergraph_of<C2>(&self, other: &Graph<V, C2>) -> bool
    where
        C2: VertexComparer<V>,
    {
        other.is_proper_subgraph_of(self)
    }

    /// A subgraph of `other` that also keeps every edge `other` has between its vertices.
    pub fn is_induced_subgraph_of<C2>(&self, other: &Graph<V, C2>) -> bool
    where
        C2: VertexComparer<V>,
    {
        if !self.is_subgraph_of(other) {
            return false;
        }
        other.edge_ids().all(|(a, b)| {
            let (a, b) = (other.vertex_at(a), other.vertex_at(b));
            !(self.contains_vertex(a) && self.contains_vertex(b)) || self.contains_edge(a, b)
        })
    }
}

impl<V, C> PartialEq for Graph<V, C>
where
    C: VertexComparer<V>,
{
    fn eq(&self, other: &Self) -> bool {
        self.graph_equals(other)
    }
}

impl<V, C> Eq for Graph<V, C> where C: VertexComparer<V> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitive_reduction_uses_the_original_edge_set() {
        // Both a -> c and a -> d are implied; removing one must not hide the other.
        let mut g: Graph<&str> = Graph::directed();
        g.extend([("a", "b"), ("b", "c"), ("c", "d"), ("a", "c"), ("a", "d")]);
        assert_eq!(g.reduce_transitions(), 2);
        assert!(g.contains_edge(&"a", &"b"));
        assert!(!g.contains_edge(&"a", &"c"));
        assert!(!g.contains_edge(&"a", &"d"));
    }

    #[test]
    fn copies_renumber_vertices_densely() {
        let mut g: Graph<u32> = Graph::directed();
        g.extend([(1, 2), (2, 3), (3, 4)]);
        g.remove_vertex(&1);
        let t = g.transposition();
        assert_eq!(t.id_bound(), 3);
        assert!(t.contains_edge(&3, &2));
        assert!(t.contains_edge(&4, &3));
    }
}
