//! Mutable directed and undirected graphs with derived-relation algorithms.
//!
//! [`Graph`] owns its vertices and an adjacency row per vertex. On top of that it offers
//! reachability and connectivity queries, strict and keyed topological ordering, reflexive
//! and transitive reduction, transposition, induced subgraphs and subgraph predicates.
//! Vertex identity is decided by a [`VertexComparer`], so a graph can for example treat
//! `"Core"` and `"core"` as the same vertex.
//!
//! [`TopologicalSortExt`] orders plain sequences by their dependencies and, unlike
//! [`Graph::topological_order`], tolerates cycles.

pub mod comparer;
pub mod error;
pub mod graph;
pub mod sequence;

pub use comparer::{AsciiCaseInsensitive, DefaultComparer, KeyComparer, VertexComparer};
pub use error::{GraphError, Result};
pub use graph::{
    Direction, Dot, EdgeCursor, EdgeIter, Edges, EdgesMut, Graph, GraphBuilder, GraphOptions,
    TopologicalOrder, TopologicalOrderBy, VertexCursor, VertexIter, Vertices, VerticesMut,
};
pub use sequence::TopologicalSortExt;
