//! Detached, version-checked enumeration.
//!
//! A cursor does not borrow the graph between steps, so the graph can be mutated while a
//! cursor is alive. The cursor remembers the graph version it started from and every
//! `next(&graph)` call fails with [`GraphError::InvalidatedEnumeration`] once the graph has
//! changed structurally, instead of yielding stale or skipped elements.
//!
//! [`GraphError::InvalidatedEnumeration`]: crate::GraphError::InvalidatedEnumeration

use super::Graph;
use super::store::VertexId;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct VertexCursor {
    graph: u64,
    version: u64,
    next_slot: usize,
}

impl VertexCursor {
    pub(in crate::graph) fn new<V, C>(graph: &Graph<V, C>) -> Self {
        Self {
            graph: graph.identity,
            version: graph.version,
            next_slot: 0,
        }
    }

    pub fn next<'g, V, C>(&mut self, graph: &'g Graph<V, C>) -> Result<Option<&'g V>> {
        graph.check_cursor(self.graph, self.version)?;
        let slots = graph.store.slots();
        while let Some(slot) = slots.get(self.next_slot) {
            self.next_slot += 1;
            if let Some(entry) = slot {
                return Ok(Some(&entry.vertex));
            }
        }
        Ok(None)
    }
}

#[derive(Debug, Clone)]
pub struct EdgeCursor {
    graph: u64,
    version: u64,
    next_slot: usize,
    from: Option<VertexId>,
    // Targets of `from` not yet yielded. Valid only while the version matches.
    pending: Vec<VertexId>,
}

impl EdgeCursor {
    pub(in crate::graph) fn new<V, C>(graph: &Graph<V, C>) -> Self {
        Self {
            graph: graph.identity,
            version: graph.version,
            next_slot: 0,
            from: None,
            pending: Vec::new(),
        }
    }

    pub fn next<'g, V, C>(&mut self, graph: &'g Graph<V, C>) -> Result<Option<(&'g V, &'g V)>> {
        graph.check_cursor(self.graph, self.version)?;
        loop {
            if let (Some(from), Some(to)) = (self.from, self.pending.pop()) {
                return Ok(Some((graph.store.vertex(from), graph.store.vertex(to))));
            }
            let Some(slot) = graph.store.slots().get(self.next_slot) else {
                self.from = None;
                return Ok(None);
            };
            let from = self.next_slot;
            self.next_slot += 1;
            let Some(row) = slot.as_ref().and_then(|e| e.row.as_ref()) else {
                continue;
            };
            let directed = graph.is_directed();
            self.from = Some(from);
            self.pending = row
                .iter()
                .copied()
                .filter(|&to| directed || from <= to)
                .collect();
            // Pop from the back while preserving row iteration order.
            self.pending.reverse();
        }
    }
}
