//! Streaming median-degree processor.
//!
//! Applies one unit of work at a time: prune, insert/refresh, median, emit.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::median::MedianTracker;
use crate::policy::WindowPolicy;
use crate::store::{EdgeUpdate, TemporalGraph, WindowedGraph};
use crate::types::{InteractionEvent, MedianOutput, StreamInput};

/// Counters describing what the processor has done so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorStats {
    /// Units of work seen (events, invalid records and blanks).
    pub inputs: u64,
    /// Valid events received.
    pub events: u64,
    /// Events that created a new edge.
    pub inserted: u64,
    /// Events that refreshed an existing edge.
    pub refreshed: u64,
    /// Events whose edge already carried a newer or equal timestamp.
    pub unchanged: u64,
    /// Events older than the window relative to the watermark.
    pub stale: u64,
    /// Records that failed validation.
    pub invalid: u64,
    /// Blank records.
    pub blank: u64,
    /// Eviction passes run.
    pub prune_passes: u64,
    /// Edges removed by eviction.
    pub edges_evicted: u64,
    /// Nodes removed by eviction.
    pub nodes_evicted: u64,
}

/// Streaming processor.
///
/// Owns the windowed graph exclusively, together with the watermark and the
/// last known median. `last_median == None` is the "no median yet" state.
///
/// ## Algorithm (per valid event at `t`)
///
/// 1. If `t > watermark` and the watermark has left the floor, evict edges
///    with `created_time <= t - width` and the nodes they isolate
/// 2. If `t > watermark - width`, insert or refresh the event's edge
/// 3. Advance the watermark to `max(watermark, t)`
/// 4. Compute the median degree; if defined, store and emit it, otherwise
///    emit the last known median
#[derive(Debug, Clone)]
pub struct StreamProcessor<G: WindowedGraph = TemporalGraph> {
    graph: G,
    policy: WindowPolicy,
    tracker: MedianTracker,
    watermark: i64,
    last_median: Option<f64>,
    stats: ProcessorStats,
}

impl StreamProcessor<TemporalGraph> {
    /// Create a processor over an empty in-memory graph.
    pub fn new(policy: WindowPolicy) -> Self {
        Self::with_graph(TemporalGraph::new(), policy)
    }
}

impl Default for StreamProcessor<TemporalGraph> {
    fn default() -> Self {
        Self::new(WindowPolicy::default())
    }
}

impl<G: WindowedGraph> StreamProcessor<G> {
    /// Create a processor over a caller-supplied graph backend.
    ///
    /// The watermark starts at the policy floor.
    pub fn with_graph(graph: G, policy: WindowPolicy) -> Self {
        Self {
            graph,
            watermark: policy.floor,
            policy,
            tracker: MedianTracker::new(),
            last_median: None,
            stats: ProcessorStats::default(),
        }
    }

    /// Process one unit of work and return exactly one output.
    pub fn process(&mut self, input: StreamInput) -> MedianOutput {
        self.stats.inputs += 1;

        match input {
            StreamInput::Event(event) => self.apply(&event),
            StreamInput::Invalid => {
                self.stats.invalid += 1;
                debug!(last_median = ?self.last_median, "invalid record, reusing last median");
                MedianOutput::from_option(self.last_median)
            }
            StreamInput::Blank => {
                self.stats.blank += 1;
                MedianOutput::NoValue
            }
        }
    }

    /// Apply a validated event and return the resulting median.
    pub fn apply(&mut self, event: &InteractionEvent) -> MedianOutput {
        let t = event.created_time;
        self.stats.events += 1;

        if self.policy.should_prune(t, self.watermark) {
            let threshold = self.policy.eviction_threshold(t);
            let report = self.graph.evict_older_than(threshold);

            self.stats.prune_passes += 1;
            self.stats.edges_evicted += report.edges_removed as u64;
            self.stats.nodes_evicted += report.nodes_removed as u64;

            if report.edges_removed > 0 {
                debug!(
                    threshold,
                    edges_removed = report.edges_removed,
                    nodes_removed = report.nodes_removed,
                    "pruned window"
                );
            }
        }

        if self.policy.admits(t, self.watermark) {
            match self.graph.insert_or_refresh(&event.actor, &event.target, t) {
                EdgeUpdate::Inserted => self.stats.inserted += 1,
                EdgeUpdate::Refreshed => self.stats.refreshed += 1,
                EdgeUpdate::Unchanged => self.stats.unchanged += 1,
            }
        } else {
            self.stats.stale += 1;
            debug!(
                created_time = t,
                watermark = self.watermark,
                "event older than window, graph unchanged"
            );
        }

        self.watermark = self.policy.advance(self.watermark, t);

        let mut degrees = self.graph.degree_sequence();
        if let Some(median) = self.tracker.median(&mut degrees) {
            self.last_median = Some(median);
        }

        trace!(
            created_time = t,
            watermark = self.watermark,
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            median = ?self.last_median,
            "event applied"
        );

        MedianOutput::from_option(self.last_median)
    }

    /// Maximum event timestamp admitted so far (the floor before any event).
    pub fn watermark(&self) -> i64 {
        self.watermark
    }

    /// Most recently emitted defined median.
    pub fn last_median(&self) -> Option<f64> {
        self.last_median
    }

    /// Whether a median has been produced yet.
    pub fn has_median(&self) -> bool {
        self.last_median.is_some()
    }

    /// Read access to the graph.
    pub fn graph(&self) -> &G {
        &self.graph
    }

    /// Active window policy.
    pub fn policy(&self) -> &WindowPolicy {
        &self.policy
    }

    /// Counters so far.
    pub fn stats(&self) -> ProcessorStats {
        self.stats
    }
}

/// A processor behind a single lock, for use from multiple threads.
///
/// Every unit of work runs to completion under the lock, so eviction and
/// insertion for one event never interleave with another event's.
#[derive(Debug)]
pub struct SharedProcessor<G: WindowedGraph = TemporalGraph> {
    inner: Mutex<StreamProcessor<G>>,
}

impl<G: WindowedGraph> SharedProcessor<G> {
    /// Wrap a processor.
    pub fn new(processor: StreamProcessor<G>) -> Self {
        Self {
            inner: Mutex::new(processor),
        }
    }

    /// Process one unit of work under the lock.
    pub fn process(&self, input: StreamInput) -> MedianOutput {
        self.inner.lock().process(input)
    }

    /// Last known median.
    pub fn last_median(&self) -> Option<f64> {
        self.inner.lock().last_median()
    }

    /// Counters so far.
    pub fn stats(&self) -> ProcessorStats {
        self.inner.lock().stats()
    }

    /// Unwrap the processor.
    pub fn into_inner(self) -> StreamProcessor<G> {
        self.inner.into_inner()
    }
}

impl Default for SharedProcessor<TemporalGraph> {
    fn default() -> Self {
        Self::new(StreamProcessor::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EdgeKey, NodeKey};
    use crate::WINDOW_FLOOR;

    const T: i64 = WINDOW_FLOOR + 10_000;

    fn event(t: i64, actor: &str, target: &str) -> StreamInput {
        StreamInput::Event(InteractionEvent::new(t, actor, target))
    }

    #[test]
    fn test_initial_state() {
        let processor = StreamProcessor::default();
        assert_eq!(processor.watermark(), WINDOW_FLOOR);
        assert!(!processor.has_median());
        assert!(processor.graph().is_empty());
    }

    #[test]
    fn test_invalid_before_any_event_emits_no_value() {
        let mut processor = StreamProcessor::default();
        assert_eq!(processor.process(StreamInput::Invalid), MedianOutput::NoValue);
        assert_eq!(processor.watermark(), WINDOW_FLOOR);
    }

    #[test]
    fn test_invalid_reuses_last_median() {
        let mut processor = StreamProcessor::default();

        processor.process(event(T, "user1", "user22"));
        processor.process(event(T + 1, "user1", "user33"));
        processor.process(event(T + 2, "user1", "user44"));
        let last = processor.process(event(T + 3, "user22", "user33"));
        assert_eq!(last, MedianOutput::Median(2.0));

        assert_eq!(processor.process(StreamInput::Invalid), MedianOutput::Median(2.0));
        assert_eq!(processor.watermark(), T + 3);
    }

    #[test]
    fn test_blank_emits_no_value_without_mutation() {
        let mut processor = StreamProcessor::default();

        processor.process(event(T, "user1", "user22"));
        assert_eq!(processor.process(StreamInput::Blank), MedianOutput::NoValue);
        assert_eq!(processor.graph().edge_count(), 1);
        assert_eq!(processor.last_median(), Some(1.0));
    }

    #[test]
    fn test_stale_event_leaves_graph_unchanged() {
        let mut processor = StreamProcessor::default();

        processor.process(event(T, "user1", "user22"));
        let out = processor.process(event(T - 60, "user33", "user44"));

        assert_eq!(out, MedianOutput::Median(1.0));
        assert_eq!(processor.graph().edge_count(), 1);
        assert_eq!(processor.stats().stale, 1);
        assert_eq!(processor.watermark(), T);
    }

    #[test]
    fn test_out_of_order_event_within_window_is_inserted() {
        let mut processor = StreamProcessor::default();

        processor.process(event(T, "user1", "user22"));
        processor.process(event(T - 59, "user33", "user44"));

        assert_eq!(processor.graph().edge_count(), 2);
        assert_eq!(processor.watermark(), T);
    }

    #[test]
    fn test_new_edge_is_never_pruned_by_its_own_insertion() {
        let mut processor = StreamProcessor::default();

        processor.process(event(T, "user1", "user22"));
        processor.process(event(T + 60, "user1", "user22"));

        let key = EdgeKey::new(NodeKey::from("user1"), NodeKey::from("user22"));
        assert_eq!(processor.graph().edge_time(&key), Some(T + 60));
        assert_eq!(processor.stats().edges_evicted, 1);
        assert_eq!(processor.stats().inserted, 2);
    }

    #[test]
    fn test_first_event_skips_prune() {
        let mut processor = StreamProcessor::default();
        processor.process(event(T, "user1", "user22"));
        assert_eq!(processor.stats().prune_passes, 0);

        processor.process(event(T + 1, "user1", "user33"));
        assert_eq!(processor.stats().prune_passes, 1);
    }

    #[test]
    fn test_shared_processor_serializes_access() {
        let shared = SharedProcessor::new(StreamProcessor::default());

        assert_eq!(shared.process(StreamInput::Invalid), MedianOutput::NoValue);
        assert_eq!(shared.process(event(T, "user1", "user22")), MedianOutput::Median(1.0));
        assert_eq!(shared.last_median(), Some(1.0));

        let processor = shared.into_inner();
        assert_eq!(processor.stats().inputs, 2);
    }
}
