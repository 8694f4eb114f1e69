//! Vertex slots and forward adjacency rows for [`Graph`](super::Graph).
//!
//! Vertices are interned into slots; every row, cache and derived structure refers to them by
//! slot id. Lookup goes through a `hashbrown::HashTable` whose hashing and equality are
//! supplied by the graph's comparer, so the vertex type never needs to implement `Hash`.

use crate::comparer::VertexComparer;
use hashbrown::HashTable;
use hashbrown::hash_table::Entry;
use rustc_hash::FxBuildHasher;

pub(crate) type VertexId = usize;
pub(crate) type IdSet = hashbrown::HashSet<VertexId, FxBuildHasher>;

#[derive(Debug, Clone)]
pub(in crate::graph) struct VertexEntry<V> {
    pub(in crate::graph) vertex: V,
    pub(in crate::graph) hash: u64,
    /// Outgoing adjacency row; `None` while the vertex has no outgoing edges.
    pub(in crate::graph) row: Option<IdSet>,
}

#[derive(Debug, Clone)]
pub(in crate::graph) struct VertexStore<V> {
    slots: Vec<Option<VertexEntry<V>>>,
    index: HashTable<VertexId>,
}

impl<V> Default for VertexStore<V> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            index: HashTable::new(),
        }
    }
}

impl<V> VertexStore<V> {
    /// Number of slots ever allocated, including tombstones.
    pub(in crate::graph) fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(in crate::graph) fn live_count(&self) -> usize {
        self.index.len()
    }

    pub(in crate::graph) fn find<C>(&self, comparer: &C, v: &V) -> Option<VertexId>
    where
        C: VertexComparer<V>,
    {
        let hash = comparer.hash_vertex(v);
        let slots = &self.slots;
        self.index
            .find(hash, |&id| {
                slots[id]
                    .as_ref()
                    .is_some_and(|e| comparer.equivalent(&e.vertex, v))
            })
            .copied()
    }

    /// Returns the vertex id and whether a new slot was allocated.
    pub(in crate::graph) fn insert<C>(&mut self, comparer: &C, v: V) -> (VertexId, bool)
    where
        C: VertexComparer<V>,
    {
        let hash = comparer.hash_vertex(&v);
        let slots = &mut self.slots;
        match self.index.entry(
            hash,
            |&id| {
                slots[id]
                    .as_ref()
                    .is_some_and(|e| comparer.equivalent(&e.vertex, &v))
            },
            |&id| slots[id].as_ref().map_or(0, |e| e.hash),
        ) {
            Entry::Occupied(entry) => (*entry.get(), false),
            Entry::Vacant(entry) => {
                let id = slots.len();
                slots.push(Some(VertexEntry {
                    vertex: v,
                    hash,
                    row: None,
                }));
                entry.insert(id);
                (id, true)
            }
        }
    }

    /// Frees the slot of `id` and returns its entry. Rows of other vertices are untouched.
    pub(in crate::graph) fn remove_slot(&mut self, id: VertexId) -> Option<VertexEntry<V>> {
        let hash = self.slots.get(id)?.as_ref()?.hash;
        if let Ok(entry) = self.index.find_entry(hash, |&other| other == id) {
            entry.remove();
        }
        self.slots[id].take()
    }

    pub(in crate::graph) fn clear(&mut self) {
        self.slots.clear();
        self.index.clear();
    }

    /// Drops every adjacency row. Returns `true` if any edge existed.
    pub(in crate::graph) fn clear_rows(&mut self) -> bool {
        let mut had_edges = false;
        for e in self.slots.iter_mut().flatten() {
            had_edges |= e.row.take().is_some_and(|r| !r.is_empty());
        }
        had_edges
    }

    pub(in crate::graph) fn slots(&self) -> &[Option<VertexEntry<V>>] {
        &self.slots
    }

    pub(in crate::graph) fn entry(&self, id: VertexId) -> Option<&VertexEntry<V>> {
        self.slots.get(id)?.as_ref()
    }

    pub(in crate::graph) fn entry_mut(&mut self, id: VertexId) -> Option<&mut VertexEntry<V>> {
        self.slots.get_mut(id)?.as_mut()
    }

    pub(in crate::graph) fn vertex(&self, id: VertexId) -> &V {
        match &self.slots[id] {
            Some(e) => &e.vertex,
            None => unreachable!("vertex id {id} refers to a freed slot"),
        }
    }

    /// Live vertex ids in insertion order.
    pub(in crate::graph) fn ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(id, e)| e.as_ref().map(|_| id))
    }

    pub(in crate::graph) fn entries(&self) -> impl Iterator<Item = (VertexId, &VertexEntry<V>)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(id, e)| e.as_ref().map(|e| (id, e)))
    }

    pub(in crate::graph) fn row(&self, id: VertexId) -> Option<&IdSet> {
        self.entry(id)?.row.as_ref()
    }

    pub(in crate::graph) fn row_contains(&self, from: VertexId, to: VertexId) -> bool {
        self.row(from).is_some_and(|r| r.contains(&to))
    }

    pub(in crate::graph) fn successors(&self, id: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.row(id).into_iter().flat_map(|r| r.iter().copied())
    }

    /// Inserts `from -> to` into the forward row. Returns `true` when the edge is new.
    pub(in crate::graph) fn insert_edge(&mut self, from: VertexId, to: VertexId) -> bool {
        let Some(entry) = self.entry_mut(from) else {
            return false;
        };
        entry.row.get_or_insert_with(IdSet::default).insert(to)
    }

    /// Removes `from -> to`, dropping the row once it is empty. The endpoints stay members.
    pub(in crate::graph) fn remove_edge(&mut self, from: VertexId, to: VertexId) -> bool {
        let Some(entry) = self.entry_mut(from) else {
            return false;
        };
        let Some(row) = entry.row.as_mut() else {
            return false;
        };
        let removed = row.remove(&to);
        if row.is_empty() {
            entry.row = None;
        }
        removed
    }

    /// Number of stored `(from, to)` entries across all rows.
    pub(in crate::graph) fn row_entries(&self) -> usize {
        self.entries()
            .map(|(_, e)| e.row.as_ref().map_or(0, IdSet::len))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparer::{AsciiCaseInsensitive, DefaultComparer};

    #[test]
    fn insert_deduplicates_through_the_comparer() {
        let mut store: VertexStore<String> = VertexStore::default();
        let (a, new_a) = store.insert(&AsciiCaseInsensitive, "Node".to_string());
        let (b, new_b) = store.insert(&AsciiCaseInsensitive, "NODE".to_string());
        assert!(new_a);
        assert!(!new_b);
        assert_eq!(a, b);
        assert_eq!(store.vertex(a), "Node");
        assert_eq!(store.live_count(), 1);
    }

    #[test]
    fn removed_slots_are_not_found_and_not_reused() {
        let mut store: VertexStore<u32> = VertexStore::default();
        let (a, _) = store.insert(&DefaultComparer, 1);
        let (b, _) = store.insert(&DefaultComparer, 2);
        assert!(store.remove_slot(a).is_some());
        assert_eq!(store.find(&DefaultComparer, &1), None);
        assert_eq!(store.find(&DefaultComparer, &2), Some(b));

        let (c, new_c) = store.insert(&DefaultComparer, 1);
        assert!(new_c);
        assert_ne!(c, a);
        assert_eq!(store.ids().collect::<Vec<_>>(), vec![b, c]);
    }

    #[test]
    fn emptied_rows_are_dropped() {
        let mut store: VertexStore<u32> = VertexStore::default();
        let (a, _) = store.insert(&DefaultComparer, 1);
        let (b, _) = store.insert(&DefaultComparer, 2);
        assert!(store.insert_edge(a, b));
        assert!(!store.insert_edge(a, b));
        assert!(store.remove_edge(a, b));
        assert!(store.row(a).is_none());
        assert!(store.ids().any(|id| id == b));
    }
}
