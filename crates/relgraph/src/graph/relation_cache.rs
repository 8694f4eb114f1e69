//! Memoized counts and relations for [`Graph`](super::Graph).
//!
//! Each metric is either absent (recompute on next read) or consistent with the store. Every
//! structural write path calls [`RelationCache::invalidate`]; nothing tries to decide locally
//! whether a mutation could have left a metric untouched.

use std::cell::Cell;

#[derive(Debug, Clone, Default)]
pub(in crate::graph) struct RelationCache {
    order: Cell<Option<usize>>,
    size: Cell<Option<usize>>,
    cyclic: Cell<Option<bool>>,
    connected: Cell<Option<bool>>,
}

fn memoize<T: Copy>(slot: &Cell<Option<T>>, compute: impl FnOnce() -> T) -> T {
    if let Some(v) = slot.get() {
        return v;
    }
    let v = compute();
    slot.set(Some(v));
    v
}

impl RelationCache {
    pub(in crate::graph) fn invalidate(&mut self) {
        *self = Self::default();
    }

    pub(in crate::graph) fn order(&self, compute: impl FnOnce() -> usize) -> usize {
        memoize(&self.order, compute)
    }

    pub(in crate::graph) fn size(&self, compute: impl FnOnce() -> usize) -> usize {
        memoize(&self.size, compute)
    }

    pub(in crate::graph) fn cyclic(&self, compute: impl FnOnce() -> bool) -> bool {
        memoize(&self.cyclic, compute)
    }

    pub(in crate::graph) fn connected(&self, compute: impl FnOnce() -> bool) -> bool {
        memoize(&self.connected, compute)
    }

    #[cfg(test)]
    pub(in crate::graph) fn is_empty(&self) -> bool {
        self.order.get().is_none()
            && self.size.get().is_none()
            && self.cyclic.get().is_none()
            && self.connected.get().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memoized_values_survive_until_invalidated() {
        let mut cache = RelationCache::default();
        assert_eq!(cache.order(|| 3), 3);
        assert_eq!(cache.order(|| unreachable!()), 3);
        assert!(cache.cyclic(|| true));
        cache.invalidate();
        assert!(cache.is_empty());
        assert_eq!(cache.order(|| 4), 4);
    }
}
