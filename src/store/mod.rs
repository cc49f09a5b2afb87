//! Windowed graph storage.

pub mod memory;

use serde::{Deserialize, Serialize};
use crate::types::{EdgeKey, NodeKey};

/// Outcome of applying one event's edge to the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeUpdate {
    /// A new edge was created.
    Inserted,
    /// An existing edge's timestamp was bumped.
    Refreshed,
    /// The edge already carried a newer or equal timestamp.
    Unchanged,
}

/// What an eviction pass removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvictionReport {
    /// Number of stale edges removed.
    pub edges_removed: usize,
    /// Number of nodes removed after dropping to degree zero.
    pub nodes_removed: usize,
}

/// Trait for windowed graph backends.
///
/// Implementations hold at most one edge per unordered pair and never
/// retain a node of degree zero. All operations are total.
pub trait WindowedGraph {
    /// Create the edge `{a, b}` at `t`, or bump its timestamp if `t` is
    /// strictly newer than the stored one.
    fn insert_or_refresh(&mut self, a: &NodeKey, b: &NodeKey, t: i64) -> EdgeUpdate;

    /// Remove every edge with `created_time <= threshold`, then every node
    /// left with degree zero.
    fn evict_older_than(&mut self, threshold: i64) -> EvictionReport;

    /// Degrees of all present nodes (order unspecified).
    fn degree_sequence(&self) -> Vec<usize>;

    /// Timestamp of the edge identified by `key`, if present.
    fn edge_time(&self, key: &EdgeKey) -> Option<i64>;

    /// Degree of a node (zero when absent).
    fn degree(&self, node: &NodeKey) -> usize;

    /// Number of nodes.
    fn node_count(&self) -> usize;

    /// Number of edges.
    fn edge_count(&self) -> usize;

    /// Whether the graph has no nodes.
    fn is_empty(&self) -> bool {
        self.node_count() == 0
    }
}

pub use memory::TemporalGraph;
