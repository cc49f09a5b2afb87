//! Golden tests for the median degree stream.
//!
//! These tests replay fixed event sequences and check every emitted output.

use median_degree::{
    run_stream, EdgeKey, EventValidator, InteractionEvent, MedianOutput, NodeKey,
    StreamInput, StreamProcessor, WindowedGraph, WINDOW_FLOOR,
};

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// 2016-04-07T03:33:19Z
const T: i64 = 1_459_999_999;

fn event(t: i64, actor: &str, target: &str) -> StreamInput {
    StreamInput::Event(InteractionEvent::new(t, actor, target))
}

fn edge(a: &str, b: &str) -> EdgeKey {
    EdgeKey::new(NodeKey::from(a), NodeKey::from(b))
}

fn record(created_time: &str, actor: &str, target: &str) -> String {
    format!(
        r#"{{"created_time": "{}", "target": "{}", "actor": "{}"}}"#,
        created_time, target, actor
    )
}

fn replay(lines: &[String]) -> Vec<String> {
    let input = lines.join("\n") + "\n";
    replay_bytes(input.as_bytes())
}

fn replay_bytes(input: &[u8]) -> Vec<String> {
    let mut processor = StreamProcessor::default();
    let validator = EventValidator::new(WINDOW_FLOOR, None);
    let mut out = Vec::new();

    run_stream(&mut processor, &validator, input, &mut out).unwrap();

    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// WINDOW TRACE
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_window_trace_evicts_whole_neighbourhood() {
    let mut processor = StreamProcessor::default();

    // Event 1: first edge
    let out = processor.process(event(T, "user1", "user22"));
    assert_eq!(out, MedianOutput::Median(1.0));
    assert_eq!(processor.watermark(), T);

    // Event 2: no eviction, user1 gets a second partner
    let out = processor.process(event(T + 30, "user1", "user33"));
    assert_eq!(out, MedianOutput::Median(1.0));
    assert_eq!(processor.graph().degree(&NodeKey::from("user1")), 2);
    assert_eq!(processor.graph().edge_count(), 2);

    // Event 3: both earlier edges are stale, their nodes disappear
    let out = processor.process(event(T + 95, "user44", "user55"));
    assert_eq!(out, MedianOutput::Median(1.0));
    assert_eq!(processor.graph().edge_count(), 1);
    assert_eq!(processor.graph().node_count(), 2);
    assert_eq!(processor.graph().edge_time(&edge("user1", "user22")), None);
    assert_eq!(processor.graph().edge_time(&edge("user1", "user33")), None);
    assert_eq!(processor.graph().edge_time(&edge("user44", "user55")), Some(T + 95));
    assert_eq!(processor.watermark(), T + 95);

    // Malformed record reuses the last median
    let out = processor.process(StreamInput::Invalid);
    assert_eq!(out, MedianOutput::Median(1.0));
    assert_eq!(processor.watermark(), T + 95);
}

#[test]
fn test_eviction_boundary() {
    let mut processor = StreamProcessor::default();

    processor.process(event(T, "alpha", "bravo"));
    processor.process(event(T + 59, "charlie", "delta"));
    assert_eq!(processor.graph().edge_time(&edge("alpha", "bravo")), Some(T));

    processor.process(event(T + 60, "echo1", "foxtrot"));
    assert_eq!(processor.graph().edge_time(&edge("alpha", "bravo")), None);
    assert_eq!(processor.graph().edge_time(&edge("charlie", "delta")), Some(T + 59));
}

#[test]
fn test_refresh_keeps_edge_alive() {
    let mut processor = StreamProcessor::default();

    processor.process(event(T, "alpha", "bravo"));
    processor.process(event(T + 50, "bravo", "alpha"));
    processor.process(event(T + 100, "charlie", "delta"));

    assert_eq!(processor.graph().edge_time(&edge("alpha", "bravo")), Some(T + 50));
    assert_eq!(processor.graph().edge_count(), 2);
}

#[test]
fn test_even_node_count_averages() {
    let mut processor = StreamProcessor::default();

    processor.process(event(T, "hub01", "spoke1"));
    processor.process(event(T, "hub01", "spoke2"));
    processor.process(event(T, "hub01", "spoke3"));
    // degrees {3, 1, 1, 1}
    assert_eq!(processor.last_median(), Some(1.0));

    let out = processor.process(event(T + 1, "spoke1", "spoke2"));
    // degrees {3, 2, 2, 1}
    assert_eq!(out, MedianOutput::Median(2.0));

    let out = processor.process(event(T + 2, "other1", "other2"));
    // degrees {3, 2, 2, 1, 1, 1}
    assert_eq!(out, MedianOutput::Median(1.5));
    assert_eq!(out.to_string(), "1.50");
}

// ─────────────────────────────────────────────────────────────────────────────
// LINE REPLAY
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_replay_sample_stream() {
    let lines = vec![
        record("2016-03-28T23:23:12Z", "Raffi-Antilian", "Amber-Sauer"),
        record("2016-03-28T23:23:12Z", "Caroline-Kaiser-2", "Amber-Sauer"),
        record("2016-03-28T23:23:12Z", "Raffi-Antilian", "Caroline-Kaiser-2"),
        record("2016-03-28T23:23:53Z", "Amber-Sauer", "David-Ali"),
        record("2016-03-28T23:24:12Z", "Bob-Lem", "Nick-Arc"),
        r#"{"created_time": "2016-03-28T23:24:12Z", "target": "", "actor": "Nick-Arc"}"#
            .to_string(),
        String::new(),
        record("2016-03-28T23:22:13Z", "Too-Late", "Way-Too-Late"),
        record("2016-03-28T23:24:20Z", "Caroline-Kaiser-2", "David-Ali"),
    ];

    let out = replay(&lines);

    assert_eq!(
        out,
        vec![
            "1.00", // Raffi 1, Amber 1
            "1.00", // Raffi 1, Amber 2, Caroline 1
            "2.00", // triangle
            "2.00", // Raffi 2, Amber 3, Caroline 2, David 1
            "1.00", // 23:24:12 evicts the 23:23:12 triangle; Amber-David and Bob-Nick remain
            "1.00", // empty target: reuse
            "",     // blank line
            "1.00", // 23:22:13 is more than 60s behind the watermark: ignored
            "1.00", // Amber 1, David 2, Bob 1, Nick 1, Caroline 1
        ]
    );
}

#[test]
fn test_replay_invalid_prefix_writes_blanks() {
    let lines = vec![
        "not json at all".to_string(),
        r#"{"actor": "Raffi-Antilian", "target": "Amber-Sauer"}"#.to_string(),
        record("2016-03-28T23:23:12Z", "Raffi-Antilian", "Amber-Sauer"),
        "{".to_string(),
    ];

    assert_eq!(replay(&lines), vec!["", "", "1.00", "1.00"]);
}

#[test]
fn test_replay_malformed_encoding_reuses_last_median() {
    let mut input = Vec::new();
    for line in [
        record("2016-03-28T23:23:12Z", "Raffi-Antilian", "Amber-Sauer").into_bytes(),
        b"{\"created_time\": \"2016-03-28T23:23:13Z\", \"actor\": \"\xff\xfe\"}".to_vec(),
        record("2016-03-28T23:23:14Z", "Raffi-Antilian", "Caroline-Kaiser-2").into_bytes(),
        b"\x80\x81\x82".to_vec(),
    ] {
        input.extend_from_slice(&line);
        input.extend_from_slice(b"\r\n");
    }

    assert_eq!(replay_bytes(&input), vec!["1.00", "1.00", "1.00", "1.00"]);
}

#[test]
fn test_replay_malformed_encoding_before_any_event() {
    let mut input = b"\xff\n".to_vec();
    let raffi_amber = record("2016-03-28T23:23:12Z", "Raffi-Antilian", "Amber-Sauer");
    input.extend_from_slice(raffi_amber.as_bytes());
    input.push(b'\r');

    assert_eq!(replay_bytes(&input), vec!["", "1.00"]);
}
