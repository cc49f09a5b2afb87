//! WindowPolicy: trailing time-window admission and eviction rules.
//!
//! ## Ordering
//!
//! Pruning and insertion are separate passes. For each admitted event the
//! processor prunes first, using the *new* event's timestamp as reference,
//! and only then inserts or refreshes the event's edge. Both decisions are
//! evaluated against the watermark as it was *before* the event.
//!
//! ## Boundaries
//!
//! - Prune iff `t > watermark` and the watermark has left the floor.
//! - Evict every edge with `created_time <= t - width` (inclusive).
//! - Insert iff `t > watermark - width`.
//! - Overwrite an existing edge iff `t > existing` (strict); enforced by
//!   `WindowedGraph::insert_or_refresh`.

use serde::{Deserialize, Serialize};

use crate::{WINDOW_FLOOR, WINDOW_WIDTH_SECS};

/// Window policy.
///
/// Pure decision logic; holds no graph state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowPolicy {
    /// Window width in seconds.
    pub width: i64,
    /// Sentinel watermark meaning "no events admitted yet".
    pub floor: i64,
}

impl WindowPolicy {
    /// Create a policy with a custom width and floor.
    pub fn new(width: i64, floor: i64) -> Self {
        Self { width, floor }
    }

    /// Whether an event at `t` triggers an eviction pass.
    pub fn should_prune(&self, t: i64, watermark: i64) -> bool {
        t > watermark && watermark != self.floor
    }

    /// Edges with `created_time <= threshold` are stale relative to `t`.
    pub fn eviction_threshold(&self, t: i64) -> i64 {
        t.saturating_sub(self.width)
    }

    /// Whether an event at `t` is recent enough to be applied to the graph.
    pub fn admits(&self, t: i64, watermark: i64) -> bool {
        t > watermark.saturating_sub(self.width)
    }

    /// The watermark after admitting an event at `t`.
    pub fn advance(&self, watermark: i64, t: i64) -> i64 {
        watermark.max(t)
    }
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self {
            width: WINDOW_WIDTH_SECS,
            floor: WINDOW_FLOOR,
        }
    }
}
