//! Vertex equivalence used by every graph-internal set and map.
//!
//! A graph never relies on the vertex type's own `Eq`/`Hash` directly; it asks its comparer.
//! That lets a `Graph<String, AsciiCaseInsensitive>` treat `"A"` and `"a"` as one vertex in
//! adjacency rows, reachability sets and derived graphs alike.

use rustc_hash::FxBuildHasher;
use std::hash::{BuildHasher, Hash, Hasher};
use std::marker::PhantomData;

pub trait VertexComparer<V: ?Sized> {
    fn equivalent(&self, a: &V, b: &V) -> bool;

    /// Must agree with [`equivalent`](Self::equivalent): equivalent vertices hash equally.
    fn hash_vertex(&self, v: &V) -> u64;
}

/// Uses the vertex type's own `Eq` and `Hash`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultComparer;

impl<V: ?Sized + Eq + Hash> VertexComparer<V> for DefaultComparer {
    fn equivalent(&self, a: &V, b: &V) -> bool {
        a == b
    }

    fn hash_vertex(&self, v: &V) -> u64 {
        FxBuildHasher.hash_one(v)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AsciiCaseInsensitive;

impl<V: ?Sized + AsRef<str>> VertexComparer<V> for AsciiCaseInsensitive {
    fn equivalent(&self, a: &V, b: &V) -> bool {
        a.as_ref().eq_ignore_ascii_case(b.as_ref())
    }

    fn hash_vertex(&self, v: &V) -> u64 {
        let mut state = FxBuildHasher.build_hasher();
        for b in v.as_ref().bytes() {
            state.write_u8(b.to_ascii_lowercase());
        }
        state.finish()
    }
}

/// Compares vertices by a projected key, e.g. `KeyComparer::new(|t: &Task| t.id)`.
pub struct KeyComparer<F, K> {
    key: F,
    _key: PhantomData<fn() -> K>,
}

impl<F, K> KeyComparer<F, K> {
    pub fn new(key: F) -> Self {
        Self {
            key,
            _key: PhantomData,
        }
    }
}

impl<F: Clone, K> Clone for KeyComparer<F, K> {
    fn clone(&self) -> Self {
        Self::new(self.key.clone())
    }
}

impl<V: ?Sized, K, F> VertexComparer<V> for KeyComparer<F, K>
where
    F: Fn(&V) -> K,
    K: Eq + Hash,
{
    fn equivalent(&self, a: &V, b: &V) -> bool {
        (self.key)(a) == (self.key)(b)
    }

    fn hash_vertex(&self, v: &V) -> u64 {
        FxBuildHasher.hash_one((self.key)(v))
    }
}

impl<F, K> std::fmt::Debug for KeyComparer<F, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyComparer").finish_non_exhaustive()
    }
}
