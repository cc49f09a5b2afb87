//! Core types for the windowed interaction graph.

pub mod node;
pub mod edge;
pub mod event;

pub use node::NodeKey;
pub use edge::{EdgeKey, TimedEdge};
pub use event::{InteractionEvent, StreamInput, MedianOutput};
