//! Reverse adjacency cache used by [`Graph`](super::Graph).
//!
//! Directed graphs only store outgoing rows. Incoming queries (`predecessors`, in-degree,
//! weak connectivity) are answered from this cache, which is derived from the forward rows in
//! O(V+E) on first use. Additions keep it in sync; any removal drops it.

use super::store::{IdSet, VertexId, VertexStore};

#[derive(Debug, Clone, Default)]
pub(in crate::graph) struct ReverseAdjacency {
    rows: Vec<Option<IdSet>>,
}

impl ReverseAdjacency {
    pub(in crate::graph) fn build<V>(store: &VertexStore<V>) -> Self {
        let mut rows: Vec<Option<IdSet>> = vec![None; store.capacity()];
        for (from, entry) in store.entries() {
            let Some(row) = &entry.row else {
                continue;
            };
            for &to in row {
                rows[to].get_or_insert_with(IdSet::default).insert(from);
            }
        }
        Self { rows }
    }

    pub(in crate::graph) fn row(&self, id: VertexId) -> Option<&IdSet> {
        self.rows.get(id)?.as_ref()
    }

    pub(in crate::graph) fn in_degree(&self, id: VertexId) -> usize {
        self.row(id).map_or(0, IdSet::len)
    }

    pub(in crate::graph) fn on_vertex_added(&mut self, id: VertexId) {
        if self.rows.len() <= id {
            self.rows.resize(id + 1, None);
        }
    }

    pub(in crate::graph) fn on_edge_added(&mut self, from: VertexId, to: VertexId) {
        self.on_vertex_added(to);
        self.rows[to]
            .get_or_insert_with(IdSet::default)
            .insert(from);
    }

    /// Checks that every reverse entry mirrors a forward one and vice versa.
    pub(in crate::graph) fn agrees_with<V>(&self, store: &VertexStore<V>) -> bool {
        let rebuilt = Self::build(store);
        let len = self.rows.len().max(rebuilt.rows.len());
        (0..len).all(|id| {
            let ours = self.row(id).filter(|r| !r.is_empty());
            let theirs = rebuilt.row(id);
            match (ours, theirs) {
                (None, None) => true,
                (Some(a), Some(b)) => a == b,
                _ => false,
            }
        })
    }
}
