//! Graph container.
//!
//! `Graph<V, C>` stores vertices in insertion-ordered slots with an optional outgoing
//! adjacency row per vertex. Undirected graphs store both directions of every edge, so all
//! queries are symmetric without special casing at the call site.
//!
//! Derived state (reverse adjacency, counts, cyclic/connected flags) is cached behind
//! interior mutability so query APIs stay on `&self`. Every structural write invalidates it.

mod adj_cache;
mod builder;
mod cursor;
mod dot;
mod options;
mod relation_cache;
mod store;
mod topo;
mod transform;
mod traversal;
mod views;

pub use builder::GraphBuilder;
pub use cursor::{EdgeCursor, VertexCursor};
pub use dot::Dot;
pub use options::GraphOptions;
pub use topo::{TopologicalOrder, TopologicalOrderBy};
pub use traversal::Direction;
pub use views::{EdgeIter, Edges, EdgesMut, VertexIter, Vertices, VerticesMut};

pub(crate) use store::{IdSet, VertexId};

use crate::comparer::{DefaultComparer, VertexComparer};
use crate::error::{GraphError, Result};
use adj_cache::ReverseAdjacency;
use relation_cache::RelationCache;
use std::cell::{Ref, RefCell};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use store::VertexStore;

static NEXT_IDENTITY: AtomicU64 = AtomicU64::new(1);

fn next_identity() -> u64 {
    NEXT_IDENTITY.fetch_add(1, Ordering::Relaxed)
}

pub struct Graph<V, C = DefaultComparer> {
    options: GraphOptions,
    comparer: C,
    store: VertexStore<V>,

    // Incoming queries on directed graphs would otherwise scan every row. The reverse rows are
    // rebuilt lazily and never materialized for undirected graphs.
    reverse: RefCell<Option<ReverseAdjacency>>,
    relations: RelationCache,

    version: u64,
    identity: u64,
}

impl<V> Graph<V, DefaultComparer> {
    pub fn new(options: GraphOptions) -> Self {
        Self::with_comparer(options, DefaultComparer)
    }

    pub fn directed() -> Self {
        Self::new(GraphOptions::directed())
    }

    pub fn undirected() -> Self {
        Self::new(GraphOptions::undirected())
    }

    pub fn builder() -> GraphBuilder<DefaultComparer> {
        GraphBuilder::new()
    }
}

impl<V> Default for Graph<V, DefaultComparer> {
    fn default() -> Self {
        Self::new(GraphOptions::default())
    }
}

impl<V, C> Graph<V, C> {
    pub fn with_comparer(options: GraphOptions, comparer: C) -> Self {
        Self {
            options,
            comparer,
            store: VertexStore::default(),
            reverse: RefCell::new(None),
            relations: RelationCache::default(),
            version: 0,
            identity: next_identity(),
        }
    }

    pub fn options(&self) -> GraphOptions {
        self.options
    }

    pub fn is_directed(&self) -> bool {
        self.options.directed
    }

    pub fn comparer(&self) -> &C {
        &self.comparer
    }

    /// Structural version. Changes whenever a vertex or edge is added or removed.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// An empty graph with the same options and comparer.
    pub fn empty_like(&self) -> Self
    where
        C: Clone,
    {
        Self::with_comparer(self.options, self.comparer.clone())
    }

    fn bump_version(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    fn drop_reverse(&mut self) {
        *self.reverse.get_mut() = None;
    }

    pub(crate) fn check_cursor(&self, identity: u64, version: u64) -> Result<()> {
        if identity != self.identity {
            return Err(GraphError::invalid_argument(
                "graph",
                "cursor was created for a different graph instance",
            ));
        }
        if version != self.version {
            return Err(GraphError::InvalidatedEnumeration);
        }
        Ok(())
    }

    pub(crate) fn vertex_at(&self, id: VertexId) -> &V {
        self.store.vertex(id)
    }

    pub(crate) fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.store.ids()
    }

    pub(crate) fn successor_ids(&self, id: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.store.successors(id)
    }

    pub(crate) fn has_edge_ids(&self, from: VertexId, to: VertexId) -> bool {
        self.store.row_contains(from, to)
    }

    /// Number of slots ever allocated; every live id is below this bound.
    pub(crate) fn id_bound(&self) -> usize {
        self.store.capacity()
    }

    /// Edges as id pairs. Undirected graphs yield each unordered pair once.
    pub(crate) fn edge_ids(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        let directed = self.options.directed;
        self.store.entries().flat_map(move |(from, e)| {
            e.row
                .iter()
                .flat_map(|r| r.iter().copied())
                .filter(move |&to| directed || from <= to)
                .map(move |to| (from, to))
        })
    }

    fn ensure_reverse(&self) -> Ref<'_, ReverseAdjacency> {
        debug_assert!(self.options.directed);
        if self.reverse.borrow().is_none() {
            tracing::trace!(
                vertices = self.store.live_count(),
                "rebuilding reverse adjacency"
            );
            *self.reverse.borrow_mut() = Some(ReverseAdjacency::build(&self.store));
        }
        Ref::map(self.reverse.borrow(), |r| match r {
            Some(r) => r,
            None => unreachable!("reverse adjacency is present after ensure"),
        })
    }

    /// Ids of vertices with an edge into `id`.
    pub(crate) fn predecessor_ids(&self, id: VertexId) -> Vec<VertexId> {
        if !self.options.directed {
            return self.store.successors(id).collect();
        }
        let reverse = self.ensure_reverse();
        reverse
            .row(id)
            .map(|r| r.iter().copied().collect())
            .unwrap_or_default()
    }

    pub(crate) fn in_degree_of(&self, id: VertexId) -> usize {
        if !self.options.directed {
            return self.store.row(id).map_or(0, IdSet::len);
        }
        self.ensure_reverse().in_degree(id)
    }

    #[cfg(debug_assertions)]
    fn debug_check_reverse(&self) {
        if let Some(reverse) = self.reverse.borrow().as_ref() {
            debug_assert!(
                reverse.agrees_with(&self.store),
                "reverse adjacency diverged from the forward rows"
            );
        }
    }

    #[cfg(not(debug_assertions))]
    fn debug_check_reverse(&self) {}
}

impl<V, C> Graph<V, C>
where
    C: VertexComparer<V>,
{
    pub(crate) fn id_of(&self, v: &V) -> Option<VertexId> {
        self.store.find(&self.comparer, v)
    }

    pub(crate) fn intern(&mut self, v: V) -> (VertexId, bool) {
        let (id, added) = self.store.insert(&self.comparer, v);
        if added {
            if let Some(reverse) = self.reverse.get_mut() {
                reverse.on_vertex_added(id);
            }
        }
        (id, added)
    }

    pub fn contains_vertex(&self, v: &V) -> bool {
        self.id_of(v).is_some()
    }

    pub fn contains_edge(&self, from: &V, to: &V) -> bool {
        let (Some(a), Some(b)) = (self.id_of(from), self.id_of(to)) else {
            return false;
        };
        self.store.row_contains(a, b) || (!self.options.directed && self.store.row_contains(b, a))
    }

    /// The stored vertex equivalent to `v` under the graph's comparer.
    pub fn get_vertex(&self, v: &V) -> Option<&V> {
        self.id_of(v).map(|id| self.store.vertex(id))
    }

    /// Order of the graph.
    pub fn vertex_count(&self) -> usize {
        self.relations.order(|| self.store.ids().count())
    }

    /// Size of the graph. Undirected edges count once.
    pub fn edge_count(&self) -> usize {
        self.relations.size(|| {
            if self.options.directed {
                return self.store.row_entries();
            }
            let loops = self
                .store
                .ids()
                .filter(|&id| self.store.row_contains(id, id))
                .count();
            (self.store.row_entries() - loops) / 2 + loops
        })
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_count() == 0
    }

    pub fn add_vertex(&mut self, v: V) -> bool {
        self.relations.invalidate();
        let (_, added) = self.intern(v);
        if added {
            self.bump_version();
            self.debug_check_reverse();
        }
        added
    }

    /// Removes `v` and every edge incident to it.
    pub fn remove_vertex(&mut self, v: &V) -> bool {
        self.relations.invalidate();
        let Some(id) = self.id_of(v) else {
            return false;
        };
        self.remove_vertex_id(id);
        true
    }

    pub(crate) fn remove_vertex_id(&mut self, id: VertexId) {
        self.relations.invalidate();
        let incoming: Vec<VertexId> = if !self.options.directed {
            self.store.successors(id).collect()
        } else if let Some(reverse) = self.reverse.get_mut() {
            reverse
                .row(id)
                .map(|r| r.iter().copied().collect())
                .unwrap_or_default()
        } else {
            self.store
                .ids()
                .filter(|&u| self.store.row_contains(u, id))
                .collect()
        };
        for u in incoming {
            self.store.remove_edge(u, id);
        }
        self.store.remove_slot(id);
        self.drop_reverse();
        self.bump_version();
    }

    /// Adds `from -> to`, adding missing endpoints. Returns `true` when the edge is new.
    pub fn add_edge(&mut self, from: V, to: V) -> bool {
        self.relations.invalidate();
        let (a, a_added) = self.intern(from);
        let (b, b_added) = self.intern(to);
        if a_added || b_added {
            self.bump_version();
        }
        let inserted = self.add_edge_ids(a, b);
        self.debug_check_reverse();
        inserted
    }

    pub(crate) fn add_edge_ids(&mut self, a: VertexId, b: VertexId) -> bool {
        self.relations.invalidate();
        if !self.store.insert_edge(a, b) {
            return false;
        }
        if !self.options.directed {
            self.store.insert_edge(b, a);
        } else if let Some(reverse) = self.reverse.get_mut() {
            reverse.on_edge_added(a, b);
        }
        self.bump_version();
        true
    }

    /// Removes `from -> to`. Both endpoints stay in the graph even if they become isolated.
    pub fn remove_edge(&mut self, from: &V, to: &V) -> bool {
        self.relations.invalidate();
        let (Some(a), Some(b)) = (self.id_of(from), self.id_of(to)) else {
            return false;
        };
        self.remove_edge_ids(a, b)
    }

    pub(crate) fn remove_edge_ids(&mut self, a: VertexId, b: VertexId) -> bool {
        self.relations.invalidate();
        let mut removed = self.store.remove_edge(a, b);
        if !self.options.directed {
            removed |= self.store.remove_edge(b, a);
        }
        if removed {
            self.drop_reverse();
            self.bump_version();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.relations.invalidate();
        if self.store.capacity() == 0 {
            return;
        }
        self.store.clear();
        self.drop_reverse();
        self.bump_version();
    }

    /// Removes every edge and keeps all vertices.
    pub fn clear_edges(&mut self) {
        self.relations.invalidate();
        if self.store.clear_rows() {
            self.drop_reverse();
            self.bump_version();
        }
    }
}

impl<V: Clone, C: Clone> Clone for Graph<V, C> {
    fn clone(&self) -> Self {
        Self {
            options: self.options,
            comparer: self.comparer.clone(),
            store: self.store.clone(),
            reverse: RefCell::new(None),
            relations: self.relations.clone(),
            version: 0,
            identity: next_identity(),
        }
    }
}

impl<V: fmt::Debug, C> fmt::Debug for Graph<V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct Row<'a, V>(&'a VertexStore<V>, VertexId);

        impl<V: fmt::Debug> fmt::Debug for Row<'_, V> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_set()
                    .entries(self.0.successors(self.1).map(|id| self.0.vertex(id)))
                    .finish()
            }
        }

        f.write_str(if self.options.directed {
            "Graph(directed) "
        } else {
            "Graph(undirected) "
        })?;
        f.debug_map()
            .entries(
                self.store
                    .entries()
                    .map(|(id, e)| (&e.vertex, Row(&self.store, id))),
            )
            .finish()
    }
}

impl<V, C> Extend<(V, V)> for Graph<V, C>
where
    C: VertexComparer<V>,
{
    fn extend<I: IntoIterator<Item = (V, V)>>(&mut self, iter: I) {
        for (from, to) in iter {
            self.add_edge(from, to);
        }
    }
}

impl<V> FromIterator<(V, V)> for Graph<V, DefaultComparer>
where
    DefaultComparer: VertexComparer<V>,
{
    fn from_iter<I: IntoIterator<Item = (V, V)>>(iter: I) -> Self {
        let mut g = Self::default();
        g.extend(iter);
        g
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutations_invalidate_cached_relations() {
        let mut g: Graph<&str> = Graph::directed();
        g.add_edge("a", "b");
        assert_eq!(g.edge_count(), 1);
        assert!(!g.is_cyclic());
        g.add_edge("b", "a");
        assert!(g.relations.is_empty());
        assert!(g.is_cyclic());
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn reverse_adjacency_tracks_additions_and_is_dropped_on_removal() {
        let mut g: Graph<u32> = Graph::directed();
        g.add_edge(1, 2);
        assert_eq!(g.in_degree(&2), 1);
        assert!(g.reverse.borrow().is_some());

        g.add_edge(3, 2);
        assert!(g.reverse.borrow().is_some());
        assert_eq!(g.in_degree(&2), 2);

        g.remove_edge(&1, &2);
        assert!(g.reverse.borrow().is_none());
        assert_eq!(g.in_degree(&2), 1);
    }

    #[test]
    fn version_only_moves_on_structural_change() {
        let mut g: Graph<u32> = Graph::directed();
        let v0 = g.version();
        assert!(g.add_vertex(1));
        let v1 = g.version();
        assert_ne!(v0, v1);
        assert!(!g.add_vertex(1));
        assert_eq!(g.version(), v1);
        assert!(!g.remove_edge(&1, &2));
        assert_eq!(g.version(), v1);
    }

    #[test]
    fn clones_are_independent() {
        let mut g: Graph<u32> = Graph::directed();
        g.add_edge(1, 2);
        let mut h = g.clone();
        h.add_edge(2, 3);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(h.edge_count(), 2);
        assert!(!g.contains_vertex(&3));
    }
}
