//! Topological ordering (Kahn's algorithm over the transposition).
//!
//! The order is produced lazily: the transposition is built on the first `next()`, and each new
//! iterator starts over from a fresh one. A graph with a cycle yields
//! the vertices that could be ordered, then a single
//! [`GraphError::CircularDependency`](crate::GraphError::CircularDependency).
//!
//! Keyed orderings replace the FIFO work queue with a priority queue ranked by a chain of key
//! stages. Each stage extracts every vertex's key exactly once; stages are consulted in order
//! and a later stage only matters when all earlier ones compare equal.

use super::Graph;
use super::store::{IdSet, VertexId};
use crate::error::{GraphError, Result};
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, VecDeque};
use std::marker::PhantomData;

impl<V, C> Graph<V, C> {
    /// Vertices ordered so that every edge `a -> b` puts `a` before `b`. Ties keep insertion
    /// order.
    pub fn topological_order(&self) -> TopologicalOrder<'_, V, C> {
        TopologicalOrder::new(self, None)
    }

    /// Topological order with ties broken by ascending `key`.
    pub fn topological_order_by<'g, K, F>(&'g self, key: F) -> TopologicalOrderBy<'g, V, C>
    where
        K: Ord + 'g,
        F: Fn(&V) -> K + 'g,
    {
        TopologicalOrderBy::new(self).then_by(key)
    }

    pub fn topological_order_by_descending<'g, K, F>(
        &'g self,
        key: F,
    ) -> TopologicalOrderBy<'g, V, C>
    where
        K: Ord + 'g,
        F: Fn(&V) -> K + 'g,
    {
        TopologicalOrderBy::new(self).then_by_descending(key)
    }

    pub fn topological_order_by_with<'g, K, F, Cmp>(
        &'g self,
        key: F,
        compare: Cmp,
    ) -> TopologicalOrderBy<'g, V, C>
    where
        K: 'g,
        F: Fn(&V) -> K + 'g,
        Cmp: Fn(&K, &K) -> Ordering + 'g,
    {
        TopologicalOrderBy::new(self).then_by_with(key, compare)
    }
}

trait OrderStage<V> {
    /// Dense ranks of `vertices` under this stage alone; equal keys share a rank.
    fn dense_ranks(&self, vertices: &[&V]) -> Vec<usize>;
}

struct KeyStage<F, K, Cmp> {
    key: F,
    compare: Cmp,
    descending: bool,
    _key: PhantomData<fn() -> K>,
}

impl<V, K, F, Cmp> OrderStage<V> for KeyStage<F, K, Cmp>
where
    F: Fn(&V) -> K,
    Cmp: Fn(&K, &K) -> Ordering,
{
    fn dense_ranks(&self, vertices: &[&V]) -> Vec<usize> {
        let keys: Vec<K> = vertices.iter().map(|&v| (self.key)(v)).collect();
        let compare = |a: usize, b: usize| {
            let o = (self.compare)(&keys[a], &keys[b]);
            if self.descending { o.reverse() } else { o }
        };
        let mut order: Vec<usize> = (0..keys.len()).collect();
        order.sort_by(|&a, &b| compare(a, b));

        let mut ranks = vec![0usize; keys.len()];
        let mut rank = 0usize;
        for (i, &pos) in order.iter().enumerate() {
            if i > 0 && compare(order[i - 1], pos) != Ordering::Equal {
                rank += 1;
            }
            ranks[pos] = rank;
        }
        ranks
    }
}

/// A keyed topological ordering. Add tie-breaking stages with `then_by*`, then iterate; each
/// iteration re-extracts keys and reruns the algorithm.
pub struct TopologicalOrderBy<'g, V, C> {
    graph: &'g Graph<V, C>,
    stages: Vec<Box<dyn OrderStage<V> + 'g>>,
}

impl<'g, V, C> TopologicalOrderBy<'g, V, C> {
    fn new(graph: &'g Graph<V, C>) -> Self {
        Self {
            graph,
            stages: Vec::new(),
        }
    }

    fn push_stage<K, F, Cmp>(mut self, key: F, compare: Cmp, descending: bool) -> Self
    where
        K: 'g,
        F: Fn(&V) -> K + 'g,
        Cmp: Fn(&K, &K) -> Ordering + 'g,
    {
        self.stages.push(Box::new(KeyStage {
            key,
            compare,
            descending,
            _key: PhantomData,
        }));
        self
    }

    pub fn then_by<K, F>(self, key: F) -> Self
    where
        K: Ord + 'g,
        F: Fn(&V) -> K + 'g,
    {
        self.push_stage(key, K::cmp, false)
    }

    pub fn then_by_descending<K, F>(self, key: F) -> Self
    where
        K: Ord + 'g,
        F: Fn(&V) -> K + 'g,
    {
        self.push_stage(key, K::cmp, true)
    }

    pub fn then_by_with<K, F, Cmp>(self, key: F, compare: Cmp) -> Self
    where
        K: 'g,
        F: Fn(&V) -> K + 'g,
        Cmp: Fn(&K, &K) -> Ordering + 'g,
    {
        self.push_stage(key, compare, false)
    }

    /// Priority of every vertex id: position in the composite key order, insertion order last.
    fn ranks(&self) -> Vec<usize> {
        let ids: Vec<VertexId> = self.graph.vertex_ids().collect();
        let vertices: Vec<&V> = ids.iter().map(|&id| self.graph.vertex_at(id)).collect();
        let stage_ranks: Vec<Vec<usize>> = self
            .stages
            .iter()
            .map(|s| s.dense_ranks(&vertices))
            .collect();

        let composite = |a: usize, b: usize| {
            stage_ranks
                .iter()
                .map(|r| r[a].cmp(&r[b]))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
        };
        let mut order: Vec<usize> = (0..ids.len()).collect();
        order.sort_by(|&a, &b| composite(a, b));

        let mut by_id = vec![usize::MAX; self.graph.id_bound()];
        for (rank, &pos) in order.iter().enumerate() {
            by_id[ids[pos]] = rank;
        }
        by_id
    }

    pub fn iter(&self) -> TopologicalOrder<'g, V, C> {
        TopologicalOrder::new(self.graph, Some(self.ranks()))
    }
}

impl<'g, V, C> IntoIterator for &TopologicalOrderBy<'g, V, C> {
    type Item = Result<&'g V>;
    type IntoIter = TopologicalOrder<'g, V, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'g, V, C> IntoIterator for TopologicalOrderBy<'g, V, C> {
    type Item = Result<&'g V>;
    type IntoIter = TopologicalOrder<'g, V, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

enum WorkQueue {
    Fifo(VecDeque<VertexId>),
    Ranked {
        ranks: Vec<usize>,
        heap: BinaryHeap<Reverse<(usize, VertexId)>>,
    },
}

impl WorkQueue {
    fn push(&mut self, id: VertexId) {
        match self {
            Self::Fifo(q) => q.push_back(id),
            Self::Ranked { ranks, heap } => heap.push(Reverse((ranks[id], id))),
        }
    }

    fn pop(&mut self) -> Option<VertexId> {
        match self {
            Self::Fifo(q) => q.pop_front(),
            Self::Ranked { heap, .. } => heap.pop().map(|Reverse((_, id))| id),
        }
    }
}

struct Kahn {
    // Row `v` holds the original predecessors of `v` that have not been emitted yet, i.e. the
    // outgoing row of `v` in the transposition.
    transposed: Vec<IdSet>,
    remaining_edges: usize,
    queue: WorkQueue,
}

impl Kahn {
    fn start<V, C>(graph: &Graph<V, C>, ranks: Option<Vec<usize>>) -> Self {
        let mut transposed: Vec<IdSet> = vec![IdSet::default(); graph.id_bound()];
        let mut remaining_edges = 0usize;
        for (from, to) in graph.edge_ids() {
            transposed[to].insert(from);
            remaining_edges += 1;
        }

        let mut queue = match ranks {
            Some(ranks) => WorkQueue::Ranked {
                ranks,
                heap: BinaryHeap::new(),
            },
            None => WorkQueue::Fifo(VecDeque::new()),
        };
        for id in graph.vertex_ids() {
            if transposed[id].is_empty() {
                queue.push(id);
            }
        }

        Self {
            transposed,
            remaining_edges,
            queue,
        }
    }

    fn step<V, C>(&mut self, graph: &Graph<V, C>) -> Option<VertexId> {
        let v = self.queue.pop()?;
        for u in graph.successor_ids(v) {
            if self.transposed[u].remove(&v) {
                self.remaining_edges -= 1;
                if self.transposed[u].is_empty() {
                    self.queue.push(u);
                }
            }
        }
        Some(v)
    }
}

enum State {
    Pending(Option<Vec<usize>>),
    Running(Kahn),
    Finished,
}

/// Lazy topological order. See [`Graph::topological_order`].
pub struct TopologicalOrder<'g, V, C> {
    graph: &'g Graph<V, C>,
    state: State,
}

impl<'g, V, C> TopologicalOrder<'g, V, C> {
    fn new(graph: &'g Graph<V, C>, ranks: Option<Vec<usize>>) -> Self {
        Self {
            graph,
            state: State::Pending(ranks),
        }
    }
}

impl<'g, V, C> Iterator for TopologicalOrder<'g, V, C> {
    type Item = Result<&'g V>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match &mut self.state {
                State::Pending(ranks) => {
                    let ranks = ranks.take();
                    if !self.graph.is_directed() {
                        self.state = State::Finished;
                        return Some(Err(GraphError::Unsupported {
                            operation: "topological order of an undirected graph",
                        }));
                    }
                    self.state = State::Running(Kahn::start(self.graph, ranks));
                }
                State::Running(kahn) => {
                    if let Some(v) = kahn.step(self.graph) {
                        return Some(Ok(self.graph.vertex_at(v)));
                    }
                    let remaining_edges = kahn.remaining_edges;
                    self.state = State::Finished;
                    if remaining_edges > 0 {
                        tracing::debug!(remaining_edges, "topological order hit a cycle");
                        return Some(Err(GraphError::CircularDependency { remaining_edges }));
                    }
                    return None;
                }
                State::Finished => return None,
            }
        }
    }
}
