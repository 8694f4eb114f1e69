//! Set-typed views over a graph's vertices and edges.
//!
//! The read views borrow the graph and answer membership and set-relation questions through
//! the graph's comparer. The `*Mut` views add the set-mutation operations; every one of them
//! routes through the graph's own write paths so versioning and cache invalidation apply.

use super::cursor::{EdgeCursor, VertexCursor};
use super::store::{IdSet, VertexEntry, VertexId, VertexStore};
use super::Graph;
use crate::comparer::VertexComparer;
use rustc_hash::FxBuildHasher;
use std::borrow::Borrow;

pub(in crate::graph) type PairSet = hashbrown::HashSet<(VertexId, VertexId), FxBuildHasher>;

impl<V, C> Graph<V, C>
where
    C: VertexComparer<V>,
{
    pub fn vertices(&self) -> Vertices<'_, V, C> {
        Vertices { graph: self }
    }

    pub fn vertices_mut(&mut self) -> VerticesMut<'_, V, C> {
        VerticesMut { graph: self }
    }

    pub fn edges(&self) -> Edges<'_, V, C> {
        Edges { graph: self }
    }

    pub fn edges_mut(&mut self) -> EdgesMut<'_, V, C> {
        EdgesMut { graph: self }
    }

    /// Resolves `items` to ids, skipping non-members. The flag is `false` if any were skipped.
    pub(in crate::graph) fn resolve_vertices<I>(&self, items: I) -> (IdSet, bool)
    where
        I: IntoIterator,
        I::Item: Borrow<V>,
    {
        let mut ids = IdSet::default();
        let mut all_found = true;
        for item in items {
            match self.id_of(item.borrow()) {
                Some(id) => {
                    ids.insert(id);
                }
                None => all_found = false,
            }
        }
        (ids, all_found)
    }

    fn canonical_pair(&self, a: VertexId, b: VertexId) -> (VertexId, VertexId) {
        if self.options.directed || a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    /// Resolves `pairs` to canonical id pairs of existing edges, and whether every pair was one.
    pub(in crate::graph) fn resolve_edges<I, A, B>(&self, pairs: I) -> (PairSet, bool)
    where
        I: IntoIterator<Item = (A, B)>,
        A: Borrow<V>,
        B: Borrow<V>,
    {
        let mut out = PairSet::default();
        let mut all_found = true;
        for (a, b) in pairs {
            let ids = self.id_of(a.borrow()).zip(self.id_of(b.borrow()));
            match ids {
                Some((a, b)) if self.store.row_contains(a, b) => {
                    out.insert(self.canonical_pair(a, b));
                }
                _ => all_found = false,
            }
        }
        (out, all_found)
    }
}

pub struct Vertices<'g, V, C> {
    graph: &'g Graph<V, C>,
}

impl<'g, V, C> Vertices<'g, V, C>
where
    C: VertexComparer<V>,
{
    pub fn len(&self) -> usize {
        self.graph.vertex_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, v: &V) -> bool {
        self.graph.contains_vertex(v)
    }

    pub fn iter(&self) -> VertexIter<'g, V> {
        VertexIter::new(&self.graph.store)
    }

    pub fn cursor(&self) -> VertexCursor {
        VertexCursor::new(self.graph)
    }

    pub fn set_equals<I>(&self, other: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<V>,
    {
        let (ids, all_found) = self.graph.resolve_vertices(other);
        all_found && ids.len() == self.len()
    }

    pub fn is_subset_of<I>(&self, other: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<V>,
    {
        let (ids, _) = self.graph.resolve_vertices(other);
        ids.len() == self.len()
    }

    pub fn is_superset_of<I>(&self, other: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<V>,
    {
        self.graph.resolve_vertices(other).1
    }

    pub fn overlaps<I>(&self, other: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<V>,
    {
        other
            .into_iter()
            .any(|v| self.graph.contains_vertex(v.borrow()))
    }
}

impl<'g, V, C> IntoIterator for Vertices<'g, V, C>
where
    C: VertexComparer<V>,
{
    type Item = &'g V;
    type IntoIter = VertexIter<'g, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct VertexIter<'g, V> {
    slots: std::slice::Iter<'g, Option<VertexEntry<V>>>,
}

impl<'g, V> VertexIter<'g, V> {
    fn new(store: &'g VertexStore<V>) -> Self {
        Self {
            slots: store.slots().iter(),
        }
    }
}

impl<'g, V> Iterator for VertexIter<'g, V> {
    type Item = &'g V;

    fn next(&mut self) -> Option<Self::Item> {
        self.slots.by_ref().flatten().next().map(|e| &e.vertex)
    }
}

pub struct VerticesMut<'g, V, C> {
    graph: &'g mut Graph<V, C>,
}

impl<V, C> VerticesMut<'_, V, C>
where
    C: VertexComparer<V>,
{
    pub fn len(&self) -> usize {
        self.graph.vertex_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, v: &V) -> bool {
        self.graph.contains_vertex(v)
    }

    pub fn add(&mut self, v: V) -> bool {
        self.graph.add_vertex(v)
    }

    pub fn remove(&mut self, v: &V) -> bool {
        self.graph.remove_vertex(v)
    }

    pub fn clear(&mut self) {
        self.graph.clear();
    }

    pub fn union_with<I: IntoIterator<Item = V>>(&mut self, other: I) {
        for v in other {
            self.graph.add_vertex(v);
        }
    }

    pub fn intersect_with<I>(&mut self, other: I)
    where
        I: IntoIterator,
        I::Item: Borrow<V>,
    {
        let (keep, _) = self.graph.resolve_vertices(other);
        let doomed: Vec<VertexId> = self
            .graph
            .vertex_ids()
            .filter(|id| !keep.contains(id))
            .collect();
        self.graph.relations.invalidate();
        for id in doomed {
            self.graph.remove_vertex_id(id);
        }
    }

    pub fn except_with<I>(&mut self, other: I)
    where
        I: IntoIterator,
        I::Item: Borrow<V>,
    {
        self.graph.relations.invalidate();
        for v in other {
            self.graph.remove_vertex(v.borrow());
        }
    }

    /// Keeps vertices present in exactly one of the graph and `other`.
    pub fn symmetric_except_with<I: IntoIterator<Item = V>>(&mut self, other: I) {
        let mut unique: VertexStore<V> = VertexStore::default();
        for v in other {
            unique.insert(&self.graph.comparer, v);
        }
        let ids: Vec<VertexId> = unique.ids().collect();
        self.graph.relations.invalidate();
        for id in ids {
            let Some(entry) = unique.remove_slot(id) else {
                continue;
            };
            match self.graph.id_of(&entry.vertex) {
                Some(existing) => self.graph.remove_vertex_id(existing),
                None => {
                    self.graph.add_vertex(entry.vertex);
                }
            }
        }
    }
}

pub struct Edges<'g, V, C> {
    graph: &'g Graph<V, C>,
}

impl<'g, V, C> Edges<'g, V, C>
where
    C: VertexComparer<V>,
{
    pub fn len(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// On undirected graphs both orientations of a pair are the same edge.
    pub fn contains(&self, from: &V, to: &V) -> bool {
        self.graph.contains_edge(from, to)
    }

    pub fn iter(&self) -> EdgeIter<'g, V> {
        EdgeIter::new(&self.graph.store, self.graph.options.directed)
    }

    pub fn cursor(&self) -> EdgeCursor {
        EdgeCursor::new(self.graph)
    }

    pub fn set_equals<I, A, B>(&self, other: I) -> bool
    where
        I: IntoIterator<Item = (A, B)>,
        A: Borrow<V>,
        B: Borrow<V>,
    {
        let (pairs, all_found) = self.graph.resolve_edges(other);
        all_found && pairs.len() == self.len()
    }

    pub fn is_subset_of<I, A, B>(&self, other: I) -> bool
    where
        I: IntoIterator<Item = (A, B)>,
        A: Borrow<V>,
        B: Borrow<V>,
    {
        let (pairs, _) = self.graph.resolve_edges(other);
        pairs.len() == self.len()
    }

    pub fn is_superset_of<I, A, B>(&self, other: I) -> bool
    where
        I: IntoIterator<Item = (A, B)>,
        A: Borrow<V>,
        B: Borrow<V>,
    {
        self.graph.resolve_edges(other).1
    }

    pub fn overlaps<I, A, B>(&self, other: I) -> bool
    where
        I: IntoIterator<Item = (A, B)>,
        A: Borrow<V>,
        B: Borrow<V>,
    {
        other
            .into_iter()
            .any(|(a, b)| self.graph.contains_edge(a.borrow(), b.borrow()))
    }
}

impl<'g, V, C> IntoIterator for Edges<'g, V, C>
where
    C: VertexComparer<V>,
{
    type Item = (&'g V, &'g V);
    type IntoIter = EdgeIter<'g, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct EdgeIter<'g, V> {
    store: &'g VertexStore<V>,
    directed: bool,
    slots: std::iter::Enumerate<std::slice::Iter<'g, Option<VertexEntry<V>>>>,
    current: Option<(VertexId, hashbrown::hash_set::Iter<'g, VertexId>)>,
}

impl<'g, V> EdgeIter<'g, V> {
    fn new(store: &'g VertexStore<V>, directed: bool) -> Self {
        Self {
            store,
            directed,
            slots: store.slots().iter().enumerate(),
            current: None,
        }
    }
}

impl<'g, V> Iterator for EdgeIter<'g, V> {
    type Item = (&'g V, &'g V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((from, row)) = self.current.as_mut() {
                let from = *from;
                let directed = self.directed;
                if let Some(&to) = row.find(|&&to| directed || from <= to) {
                    return Some((self.store.vertex(from), self.store.vertex(to)));
                }
            }
            let (from, slot) = self.slots.next()?;
            self.current = slot
                .as_ref()
                .and_then(|e| e.row.as_ref())
                .map(|row| (from, row.iter()));
        }
    }
}

pub struct EdgesMut<'g, V, C> {
    graph: &'g mut Graph<V, C>,
}

impl<V, C> EdgesMut<'_, V, C>
where
    C: VertexComparer<V>,
{
    pub fn len(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, from: &V, to: &V) -> bool {
        self.graph.contains_edge(from, to)
    }

    pub fn add(&mut self, from: V, to: V) -> bool {
        self.graph.add_edge(from, to)
    }

    pub fn remove(&mut self, from: &V, to: &V) -> bool {
        self.graph.remove_edge(from, to)
    }

    /// Removes every edge; vertices stay.
    pub fn clear(&mut self) {
        self.graph.clear_edges();
    }

    pub fn union_with<I: IntoIterator<Item = (V, V)>>(&mut self, other: I) {
        self.graph.extend(other);
    }

    pub fn intersect_with<I, A, B>(&mut self, other: I)
    where
        I: IntoIterator<Item = (A, B)>,
        A: Borrow<V>,
        B: Borrow<V>,
    {
        let (keep, _) = self.graph.resolve_edges(other);
        let doomed: Vec<(VertexId, VertexId)> = self
            .graph
            .edge_ids()
            .filter(|pair| !keep.contains(pair))
            .collect();
        self.graph.relations.invalidate();
        for (a, b) in doomed {
            self.graph.remove_edge_ids(a, b);
        }
    }

    pub fn except_with<I, A, B>(&mut self, other: I)
    where
        I: IntoIterator<Item = (A, B)>,
        A: Borrow<V>,
        B: Borrow<V>,
    {
        self.graph.relations.invalidate();
        for (a, b) in other {
            self.graph.remove_edge(a.borrow(), b.borrow());
        }
    }

    /// Keeps edges present in exactly one of the graph and `other`. Endpoints of removed
    /// edges stay in the graph.
    pub fn symmetric_except_with<I: IntoIterator<Item = (V, V)>>(&mut self, other: I) {
        let mut toggled = PairSet::default();
        self.graph.relations.invalidate();
        for (a, b) in other {
            let (x, x_added) = self.graph.intern(a);
            let (y, y_added) = self.graph.intern(b);
            if x_added || y_added {
                self.graph.bump_version();
            }
            if !toggled.insert(self.graph.canonical_pair(x, y)) {
                continue;
            }
            if self.graph.has_edge_ids(x, y) {
                self.graph.remove_edge_ids(x, y);
            } else {
                self.graph.add_edge_ids(x, y);
            }
        }
    }
}
