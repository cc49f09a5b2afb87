//! # median-degree
//!
//! Rolling median degree of a time-windowed interaction graph.
//!
//! The processor answers one question after every event:
//!
//! > Counting only relationships seen within the trailing window, what is
//! > the median number of partners per entity?
//!
//! ## Core Contract
//!
//! 1. Maintain an undirected graph of entities, one edge per unordered pair,
//!    each edge stamped with its most recent interaction time
//! 2. Evict edges older than the window relative to the newest event, and the
//!    nodes they leave isolated
//! 3. Emit exactly one output per input unit, in input order: the median
//!    degree, the last known median, or an explicit "no value"
//!
//! ## Architecture
//!
//! ```text
//! Record → EventValidator → StreamProcessor → MedianOutput
//!                                 ↓     ↑
//!                  WindowPolicy → TemporalGraph → MedianTracker
//! ```
//!
//! ## Window Guarantees
//!
//! - Watermark is the maximum admitted timestamp and never decreases
//! - An edge created at `t0` is evicted by the first admitted event at `t >= t0 + 60`
//! - No node of degree zero survives an eviction pass

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod policy;
pub mod store;
pub mod median;
pub mod processor;
pub mod validate;
pub mod config;
pub mod runner;

// Re-exports
pub use types::{NodeKey, EdgeKey, TimedEdge, InteractionEvent, StreamInput, MedianOutput};
pub use policy::WindowPolicy;
pub use store::{WindowedGraph, TemporalGraph, EdgeUpdate, EvictionReport};
pub use median::MedianTracker;
pub use processor::{StreamProcessor, SharedProcessor, ProcessorStats};
pub use validate::{EventValidator, ValidationError, parse_timestamp, is_valid_key};
pub use config::{StreamConfig, ConfigError};
pub use runner::{run_stream, RunError};

/// Window width in seconds.
pub const WINDOW_WIDTH_SECS: i64 = 60;

/// Watermark sentinel meaning "no events yet": 2009-04-01T00:00:00Z.
///
/// Also the exclusive lower bound on accepted event timestamps.
pub const WINDOW_FLOOR: i64 = 1_238_544_000;

/// Wire format of `created_time`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
