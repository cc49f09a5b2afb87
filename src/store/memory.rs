//! In-memory temporal graph.

use std::collections::BTreeMap;
use tracing::trace;

use crate::types::{EdgeKey, NodeKey, TimedEdge};
use super::{EdgeUpdate, EvictionReport, WindowedGraph};

/// In-memory undirected graph with timestamped edges.
///
/// Uses BTreeMap for deterministic iteration order. Degrees are kept as a
/// counter per node; a self-loop counts twice toward its node's degree.
#[derive(Debug, Clone, Default)]
pub struct TemporalGraph {
    /// Edge -> created_time.
    edges: BTreeMap<EdgeKey, i64>,
    /// Node -> degree. Every entry is >= 1.
    degrees: BTreeMap<NodeKey, usize>,
}

impl TemporalGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all edges in canonical order.
    pub fn all_edges(&self) -> Vec<TimedEdge> {
        self.edges
            .iter()
            .map(|(key, t)| TimedEdge::new(key.clone(), *t))
            .collect()
    }

    /// Whether the node is present.
    pub fn contains_node(&self, node: &NodeKey) -> bool {
        self.degrees.contains_key(node)
    }

    fn bump_degree(&mut self, node: &NodeKey) {
        *self.degrees.entry(node.clone()).or_insert(0) += 1;
    }

    fn drop_degree(&mut self, node: &NodeKey) {
        if let Some(degree) = self.degrees.get_mut(node) {
            *degree = degree.saturating_sub(1);
        }
    }
}

impl WindowedGraph for TemporalGraph {
    fn insert_or_refresh(&mut self, a: &NodeKey, b: &NodeKey, t: i64) -> EdgeUpdate {
        let key = EdgeKey::new(a.clone(), b.clone());

        match self.edges.get(&key).copied() {
            Some(created) if t > created => {
                self.edges.insert(key, t);
                EdgeUpdate::Refreshed
            }
            Some(_) => EdgeUpdate::Unchanged,
            None => {
                self.bump_degree(a);
                self.bump_degree(b);
                self.edges.insert(key, t);
                EdgeUpdate::Inserted
            }
        }
    }

    fn evict_older_than(&mut self, threshold: i64) -> EvictionReport {
        // Pass 1: edges
        let stale: Vec<EdgeKey> = self
            .edges
            .iter()
            .filter(|(_, created)| **created <= threshold)
            .map(|(key, _)| key.clone())
            .collect();

        for key in &stale {
            self.edges.remove(key);
            self.drop_degree(key.low());
            self.drop_degree(key.high());
            trace!(edge = %key, threshold, "evicted stale edge");
        }

        // Pass 2: nodes left isolated by pass 1
        let before = self.degrees.len();
        self.degrees.retain(|_, degree| *degree > 0);

        EvictionReport {
            edges_removed: stale.len(),
            nodes_removed: before - self.degrees.len(),
        }
    }

    fn degree_sequence(&self) -> Vec<usize> {
        self.degrees.values().copied().collect()
    }

    fn edge_time(&self, key: &EdgeKey) -> Option<i64> {
        self.edges.get(key).copied()
    }

    fn degree(&self, node: &NodeKey) -> usize {
        self.degrees.get(node).copied().unwrap_or(0)
    }

    fn node_count(&self) -> usize {
        self.degrees.len()
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
