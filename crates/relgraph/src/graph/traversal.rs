//! Adjacency queries, reachability and connectivity.

use super::Graph;
use super::store::{IdSet, VertexId};
use crate::comparer::VertexComparer;
use crate::error::{GraphError, Result};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Outgoing,
    Incoming,
    Both,
}

impl<V, C> Graph<V, C> {
    fn ids_to_vertices(&self, ids: impl IntoIterator<Item = VertexId>) -> Vec<&V> {
        ids.into_iter().map(|id| self.store.vertex(id)).collect()
    }

    fn adjacent_ids(&self, id: VertexId, direction: Direction) -> Vec<VertexId> {
        if !self.options.directed {
            return self.store.successors(id).collect();
        }
        match direction {
            Direction::Outgoing => self.store.successors(id).collect(),
            Direction::Incoming => self.predecessor_ids(id),
            Direction::Both => {
                let mut seen = IdSet::default();
                let mut out = Vec::new();
                for other in self
                    .store
                    .successors(id)
                    .chain(self.predecessor_ids(id))
                {
                    if seen.insert(other) {
                        out.push(other);
                    }
                }
                out
            }
        }
    }

    /// Vertices reachable from `start` by a path of length one or more.
    pub(crate) fn reachable_ids(&self, start: VertexId) -> IdSet {
        let mut reached = IdSet::default();
        let mut stack: Vec<VertexId> = self.store.successors(start).collect();
        while let Some(v) = stack.pop() {
            if !reached.insert(v) {
                continue;
            }
            stack.extend(self.store.successors(v).filter(|w| !reached.contains(w)));
        }
        reached
    }

    /// True when a path of length two or more leads from `from` to `to` without using the
    /// direct edge `from -> to`.
    pub(crate) fn has_transitive_path_ids(&self, from: VertexId, to: VertexId) -> bool {
        let mut visited = IdSet::default();
        let mut stack: Vec<VertexId> = self
            .store
            .successors(from)
            .filter(|&w| w != to && w != from)
            .collect();
        while let Some(v) = stack.pop() {
            if !visited.insert(v) {
                continue;
            }
            for w in self.store.successors(v) {
                if w == to {
                    return true;
                }
                if w == from || visited.contains(&w) {
                    // Re-entering `from` could only reach `to` through the direct edge.
                    continue;
                }
                stack.push(w);
            }
        }
        false
    }

    pub(crate) fn has_path_ids(&self, from: VertexId, to: VertexId) -> bool {
        if self.store.row_contains(from, to) {
            return true;
        }
        let mut visited = IdSet::default();
        let mut stack: Vec<VertexId> = self.store.successors(from).collect();
        while let Some(v) = stack.pop() {
            if !visited.insert(v) {
                continue;
            }
            if self.store.row_contains(v, to) {
                return true;
            }
            stack.extend(self.store.successors(v).filter(|w| !visited.contains(w)));
        }
        false
    }

    /// Weakly connected component containing `start`, in discovery order.
    fn component_ids(&self, start: VertexId, seen: &mut IdSet) -> Vec<VertexId> {
        let mut component = Vec::new();
        let mut queue: VecDeque<VertexId> = VecDeque::new();
        seen.insert(start);
        queue.push_back(start);
        while let Some(v) = queue.pop_front() {
            component.push(v);
            for w in self.adjacent_ids(v, Direction::Both) {
                if seen.insert(w) {
                    queue.push_back(w);
                }
            }
        }
        component
    }

    fn compute_is_cyclic(&self) -> bool {
        if !self.options.directed {
            // A forest over `k` components has exactly `order - k` edges; anything more closes
            // a cycle. Self-loops count as edges in the undirected size.
            let order = self.store.live_count();
            let mut seen = IdSet::default();
            let mut components = 0usize;
            for id in self.store.ids() {
                if !seen.contains(&id) {
                    self.component_ids(id, &mut seen);
                    components += 1;
                }
            }
            let loops = self
                .store
                .ids()
                .filter(|&id| self.store.row_contains(id, id))
                .count();
            let size = (self.store.row_entries() - loops) / 2 + loops;
            return size + components > order;
        }

        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Mark {
            Unvisited,
            OnStack,
            Done,
        }

        let mut marks = vec![Mark::Unvisited; self.store.capacity()];
        for root in self.store.ids() {
            if marks[root] != Mark::Unvisited {
                continue;
            }
            // Explicit stack of (vertex, pending successors) keeps deep graphs off the call stack.
            let mut stack: Vec<(VertexId, Vec<VertexId>)> = Vec::new();
            marks[root] = Mark::OnStack;
            stack.push((root, self.store.successors(root).collect()));
            while let Some((v, pending)) = stack.last_mut() {
                let v = *v;
                match pending.pop() {
                    Some(w) => match marks[w] {
                        Mark::OnStack => return true,
                        Mark::Unvisited => {
                            marks[w] = Mark::OnStack;
                            let next: Vec<VertexId> = self.store.successors(w).collect();
                            stack.push((w, next));
                        }
                        Mark::Done => {}
                    },
                    None => {
                        marks[v] = Mark::Done;
                        stack.pop();
                    }
                }
            }
        }
        false
    }
}

impl<V, C> Graph<V, C>
where
    C: VertexComparer<V>,
{
    /// Vertices joined to `v` by one edge in `direction`. Empty when `v` is not a member.
    /// All directions are the same on undirected graphs.
    pub fn adjacent_to(&self, v: &V, direction: Direction) -> Vec<&V> {
        let Some(id) = self.id_of(v) else {
            return Vec::new();
        };
        self.ids_to_vertices(self.adjacent_ids(id, direction))
    }

    pub fn successors(&self, v: &V) -> Vec<&V> {
        self.adjacent_to(v, Direction::Outgoing)
    }

    pub fn predecessors(&self, v: &V) -> Vec<&V> {
        self.adjacent_to(v, Direction::Incoming)
    }

    pub fn out_degree(&self, v: &V) -> usize {
        self.id_of(v)
            .and_then(|id| self.store.row(id))
            .map_or(0, IdSet::len)
    }

    pub fn in_degree(&self, v: &V) -> usize {
        self.id_of(v).map_or(0, |id| self.in_degree_of(id))
    }

    /// A member with no incident edges.
    pub fn is_isolated(&self, v: &V) -> bool {
        self.id_of(v)
            .is_some_and(|id| self.store.row(id).is_none() && self.in_degree_of(id) == 0)
    }

    /// True when `to` can be reached from `from` by following one or more edges.
    pub fn has_path(&self, from: &V, to: &V) -> bool {
        let (Some(a), Some(b)) = (self.id_of(from), self.id_of(to)) else {
            return false;
        };
        self.has_path_ids(a, b)
    }

    pub fn is_cyclic(&self) -> bool {
        self.relations.cyclic(|| {
            let cyclic = self.compute_is_cyclic();
            tracing::trace!(cyclic, "computed graph cyclicity");
            cyclic
        })
    }

    /// Every vertex can reach every other one when edge direction is ignored. Graphs with
    /// fewer than two vertices are connected.
    pub fn is_connected(&self) -> bool {
        self.relations.connected(|| {
            let order = self.store.live_count();
            if order < 2 {
                return true;
            }
            let Some(start) = self.store.ids().next() else {
                return true;
            };
            let mut seen = IdSet::default();
            self.component_ids(start, &mut seen).len() == order
        })
    }

    /// Vertices connected with `v` when edge direction is ignored, `v` included.
    pub fn connected_with(&self, v: &V) -> Result<Vec<&V>> {
        let Some(id) = self.id_of(v) else {
            return Err(GraphError::invalid_argument(
                "vertex",
                "vertex is not a member of the graph",
            ));
        };
        let mut seen = IdSet::default();
        Ok(self.ids_to_vertices(self.component_ids(id, &mut seen)))
    }

    /// Weakly connected components; vertices and components in first-seen order.
    pub fn connected_components(&self) -> Vec<Vec<&V>> {
        let mut seen = IdSet::default();
        let mut out = Vec::new();
        for id in self.store.ids() {
            if seen.contains(&id) {
                continue;
            }
            out.push(self.ids_to_vertices(self.component_ids(id, &mut seen)));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitive_path_ignores_the_direct_edge() {
        let mut g: Graph<&str> = Graph::directed();
        g.add_edge("a", "b");
        g.add_edge("b", "c");
        g.add_edge("a", "c");
        let a = g.id_of(&"a").unwrap();
        let b = g.id_of(&"b").unwrap();
        let c = g.id_of(&"c").unwrap();
        assert!(g.has_transitive_path_ids(a, c));
        assert!(!g.has_transitive_path_ids(a, b));
        assert!(!g.has_transitive_path_ids(b, c));
    }

    #[test]
    fn transitive_path_does_not_loop_back_through_the_source() {
        // a -> b -> a -> c uses the direct edge a -> c as its last hop.
        let mut g: Graph<&str> = Graph::directed();
        g.add_edge("a", "b");
        g.add_edge("b", "a");
        g.add_edge("a", "c");
        let a = g.id_of(&"a").unwrap();
        let c = g.id_of(&"c").unwrap();
        assert!(!g.has_transitive_path_ids(a, c));
    }

    #[test]
    fn reachable_ids_excludes_start_unless_on_a_cycle() {
        let mut g: Graph<u8> = Graph::directed();
        g.add_edge(1, 2);
        g.add_edge(2, 3);
        let one = g.id_of(&1).unwrap();
        assert!(!g.reachable_ids(one).contains(&one));
        g.add_edge(3, 1);
        let one = g.id_of(&1).unwrap();
        assert!(g.reachable_ids(one).contains(&one));
    }
}
