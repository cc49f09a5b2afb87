//! Edge types for the interaction graph.

use serde::{Deserialize, Serialize};
use super::node::NodeKey;

/// Unordered pair of node keys identifying an edge.
///
/// The pair is stored canonically as `(low, high)`, so the key built from
/// `(a, b)` equals the key built from `(b, a)`. Implements `Ord` for
/// deterministic ordering: (low, high).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeKey {
    low: NodeKey,
    high: NodeKey,
}

impl EdgeKey {
    /// Create the canonical key for the pair `{a, b}`.
    pub fn new(a: NodeKey, b: NodeKey) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    /// The smaller endpoint.
    pub fn low(&self) -> &NodeKey {
        &self.low
    }

    /// The larger endpoint.
    pub fn high(&self) -> &NodeKey {
        &self.high
    }

    /// Whether both endpoints are the same node.
    pub fn is_loop(&self) -> bool {
        self.low == self.high
    }
}

impl std::fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}--{}", self.low, self.high)
    }
}

/// Edge together with the timestamp of the event that last created or refreshed it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimedEdge {
    /// Endpoints.
    pub key: EdgeKey,
    /// Unix timestamp (seconds) of the most recent qualifying event.
    pub created_time: i64,
}

impl TimedEdge {
    /// Create a new timed edge.
    pub fn new(key: EdgeKey, created_time: i64) -> Self {
        Self { key, created_time }
    }
}
