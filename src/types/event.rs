//! Stream units: validated events, failure signals, and per-event outputs.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::edge::EdgeKey;
use super::node::NodeKey;

/// A validated interaction between two entities at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionEvent {
    /// Unix timestamp (seconds) of the interaction.
    pub created_time: i64,
    /// Acting entity.
    pub actor: NodeKey,
    /// Target entity.
    pub target: NodeKey,
}

impl InteractionEvent {
    /// Create a new event.
    pub fn new(created_time: i64, actor: impl Into<NodeKey>, target: impl Into<NodeKey>) -> Self {
        Self {
            created_time,
            actor: actor.into(),
            target: target.into(),
        }
    }

    /// Canonical edge key for this event's (unordered) pair.
    pub fn edge_key(&self) -> EdgeKey {
        EdgeKey::new(self.actor.clone(), self.target.clone())
    }
}

/// One unit of work handed to the stream processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamInput {
    /// Parsed and schema-conformant event.
    Event(InteractionEvent),
    /// Record failed decoding or schema validation.
    Invalid,
    /// Empty record at the boundary layer.
    Blank,
}

impl From<InteractionEvent> for StreamInput {
    fn from(event: InteractionEvent) -> Self {
        Self::Event(event)
    }
}

/// Result emitted for one unit of work.
///
/// Renders with two fractional digits, or as an empty string for `NoValue`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MedianOutput {
    /// Median degree of the current windowed graph (or the last known one).
    Median(f64),
    /// No median has been produced yet.
    NoValue,
}

impl MedianOutput {
    /// Build from an optional median.
    pub fn from_option(median: Option<f64>) -> Self {
        median.map_or(Self::NoValue, Self::Median)
    }

    /// The median value, if any.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Median(m) => Some(*m),
            Self::NoValue => None,
        }
    }
}

impl fmt::Display for MedianOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Median(m) => write!(f, "{:.2}", m),
            Self::NoValue => Ok(()),
        }
    }
}
