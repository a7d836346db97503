//! Request/response behaviour of the task engine.

use approx::assert_abs_diff_eq;
use marlin_progress::{CancelToken, NullSink, Phase, ProgressEvent};
use marlin_task::{ErrorKind, Message, TaskDefaults, TaskEngine, WireRequest};
use serde_json::{Value, json};

fn engine() -> TaskEngine {
    TaskEngine::new(TaskDefaults::default())
}

fn result_of(message: Message) -> Value {
    match message {
        Message::Result { result, success, .. } => {
            assert!(success);
            result
        }
        other => panic!("expected RESULT, got {other:?}"),
    }
}

fn rows(n: usize) -> Value {
    Value::Array(
        (0..n)
            .map(|i| {
                let x = i as f64;
                json!({"A": x, "B": 2.0 * x + 1.0, "C": -x})
            })
            .collect(),
    )
}

#[test]
fn correlation_matrix_result() {
    let msg = engine().handle(
        WireRequest::new("CORRELATION_MATRIX", "c1", rows(40)),
        CancelToken::new(),
        &mut NullSink,
    );
    assert_eq!(msg.correlation_id(), "c1");
    let result = result_of(msg);
    assert_eq!(result["symbols"], json!(["A", "B", "C"]));
    let m = &result["matrix"];
    assert_abs_diff_eq!(m[0][1].as_f64().unwrap(), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(m[0][2].as_f64().unwrap(), -1.0, epsilon = 1e-12);
    assert_eq!(result["metadata"]["dataPoints"], 40);
    assert_eq!(result["metadata"]["method"], "pearson");
}

#[test]
fn cache_stats_after_correlation_and_clear() {
    let engine = engine();
    engine.handle(
        WireRequest::new("CORRELATION_MATRIX", "c", rows(40)),
        CancelToken::new(),
        &mut NullSink,
    );

    let stats = result_of(engine.handle(
        WireRequest::new("CACHE_STATS", "s", Value::Null),
        CancelToken::new(),
        &mut NullSink,
    ));
    assert_eq!(stats["correlationCacheSize"], 3);
    assert_eq!(stats["maxCacheSize"], 100);

    let cleared = result_of(engine.handle(
        WireRequest::new("CLEAR_CACHE", "x", Value::Null),
        CancelToken::new(),
        &mut NullSink,
    ));
    assert!(cleared["message"].is_string());

    let stats = result_of(engine.handle(
        WireRequest::new("CACHE_STATS", "s2", Value::Null),
        CancelToken::new(),
        &mut NullSink,
    ));
    assert_eq!(stats["correlationCacheSize"], 0);
}

#[test]
fn kmeans_result_shape() {
    let points: Vec<Value> = (0..20)
        .map(|i| {
            let offset = if i < 10 { 0.0 } else { 50.0 };
            json!([offset + (i % 10) as f64 * 0.1, offset])
        })
        .collect();
    let result = result_of(engine().handle(
        WireRequest::new("KMEANS_CLUSTERING", "k", Value::Array(points))
            .with_options(json!({"k": 2, "seed": 3})),
        CancelToken::new(),
        &mut NullSink,
    ));
    let mut counts: Vec<u64> = result["clusterCounts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_u64().unwrap())
        .collect();
    counts.sort_unstable();
    assert_eq!(counts, vec![10, 10]);
    assert_eq!(result["converged"], true);
    assert!(result["silhouetteScore"].as_f64().unwrap() > 0.9);
    assert_eq!(result["assignments"].as_array().unwrap().len(), 20);
}

#[test]
fn optimization_sphere() {
    let mut events: Vec<ProgressEvent> = Vec::new();
    let msg = engine().handle(
        WireRequest::new(
            "OPTIMIZATION",
            "o",
            json!({"objective": {"kind": "sphere"}, "constraints": null, "initialGuess": [10.0, 10.0]}),
        ),
        CancelToken::new(),
        &mut events,
    );
    let result = result_of(msg);
    let solution = result["solution"].as_array().unwrap();
    assert_abs_diff_eq!(solution[0].as_f64().unwrap(), 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(solution[1].as_f64().unwrap(), 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(result["value"].as_f64().unwrap(), 0.0, epsilon = 1e-10);
    assert!(result["iterations"].as_u64().unwrap() <= 1000);
    assert!(!events.is_empty());
    assert!(events.iter().all(|e| !e.is_failure()));
}

#[test]
fn unknown_type_is_unsupported() {
    let mut events: Vec<ProgressEvent> = Vec::new();
    let msg = engine().handle(
        WireRequest::new("WAVELET", "w", json!([1, 2, 3])),
        CancelToken::new(),
        &mut events,
    );
    assert_eq!(msg.error_kind(), Some(ErrorKind::UnsupportedOperation));
    assert!(events.is_empty());
}

#[test]
fn invalid_points_emit_only_failure_sentinel() {
    let mut events: Vec<ProgressEvent> = Vec::new();
    let msg = engine().handle(
        WireRequest::new("KMEANS_CLUSTERING", "k", json!([[1.0, 2.0], [3.0]])),
        CancelToken::new(),
        &mut events,
    );
    assert_eq!(msg.error_kind(), Some(ErrorKind::InvalidInput));
    match msg {
        Message::Error { error, success, .. } => {
            assert!(!success);
            assert_eq!(error.message, "point 1 has dimension 1, expected 2");
        }
        other => panic!("expected ERROR, got {other:?}"),
    }
    // Validation fails before any iteration; only the failure sentinel.
    assert_eq!(events.len(), 1);
    assert!(events[0].is_failure());
}

#[test]
fn cancelled_task_reports_cancelled_kind() {
    let token = CancelToken::new();
    token.cancel();
    let msg = engine().handle(
        WireRequest::new("CORRELATION_MATRIX", "c", rows(40)),
        token,
        &mut NullSink,
    );
    assert_eq!(msg.error_kind(), Some(ErrorKind::Cancelled));
}

#[test]
fn cancelled_before_start_emits_failure_sentinel() {
    let token = CancelToken::new();
    token.cancel();
    let mut events: Vec<ProgressEvent> = Vec::new();
    let msg = engine().handle(
        WireRequest::new("CORRELATION_MATRIX", "c", rows(40)),
        token,
        &mut events,
    );
    assert_eq!(msg.error_kind(), Some(ErrorKind::Cancelled));
    assert_eq!(events.len(), 1);
    assert!(events[0].is_failure());
    assert_eq!(events[0].phase, Phase::Correlation);
}

#[test]
fn malformed_payload_emits_failure_sentinel() {
    let mut events: Vec<ProgressEvent> = Vec::new();
    let msg = engine().handle(
        WireRequest::new("OPTIMIZATION", "o", json!({"initialGuess": "nope"})),
        CancelToken::new(),
        &mut events,
    );
    assert_eq!(msg.error_kind(), Some(ErrorKind::InvalidInput));
    assert_eq!(events.len(), 1);
    assert!(events[0].is_failure());
    assert_eq!(events[0].phase, Phase::Optimization);
}

#[test]
fn unknown_option_emits_failure_sentinel() {
    let mut events: Vec<ProgressEvent> = Vec::new();
    let msg = engine().handle(
        WireRequest::new("KMEANS_CLUSTERING", "k", json!([[1.0], [2.0]]))
            .with_options(json!({"clusters": 2})),
        CancelToken::new(),
        &mut events,
    );
    assert_eq!(msg.error_kind(), Some(ErrorKind::InvalidInput));
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].phase, Phase::Clustering);
}
