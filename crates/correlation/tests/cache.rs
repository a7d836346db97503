//! Cache behaviour observed through the engine.

use marlin_correlation::{CorrelationConfig, CorrelationEngine, SeriesSet};
use marlin_progress::{CancelToken, NullSink, Reporter};

fn wide(n_symbols: usize, n_rows: usize) -> SeriesSet {
    let symbols: Vec<String> = (0..n_symbols).map(|k| format!("S{k:02}")).collect();
    SeriesSet::from_rows((0..n_rows).map(|i| {
        symbols
            .iter()
            .enumerate()
            .map(|(k, s)| {
                let t = i as f64;
                (s.clone(), Some((t * (k as f64 + 1.0) * 0.1).sin() + t * 0.01 * k as f64))
            })
            .collect::<Vec<_>>()
    }))
    .unwrap()
}

fn compute(engine: &CorrelationEngine, data: &SeriesSet) -> marlin_correlation::CorrelationMatrix {
    let mut sink = NullSink;
    let mut reporter = Reporter::new(&mut sink, CancelToken::new());
    engine
        .compute(data, &CorrelationConfig::default(), &mut reporter)
        .unwrap()
        .into_parts()
        .0
}

#[test]
fn repeated_computation_is_identical_and_hits_cache() {
    let engine = CorrelationEngine::new();
    let data = wide(6, 50);
    let first = compute(&engine, &data);
    let after_first = engine.cache_stats();
    assert_eq!(after_first.size, 15);
    assert_eq!(after_first.hits, 0);

    let second = compute(&engine, &data);
    assert_eq!(first, second);
    assert_eq!(engine.cache_stats().hits, 15);
}

#[test]
fn clear_then_stats_reports_zero() {
    let engine = CorrelationEngine::new();
    compute(&engine, &wide(4, 40));
    assert!(engine.cache_stats().size > 0);
    engine.clear_cache();
    let stats = engine.cache_stats();
    assert_eq!(stats.size, 0);
    assert_eq!(stats.capacity, 100);
}

#[test]
fn cache_never_exceeds_capacity() {
    let engine = CorrelationEngine::new();
    // C(16, 2) = 120 unique pairs > 100.
    compute(&engine, &wide(16, 40));
    assert_eq!(engine.cache_stats().size, 100);
}

#[test]
fn custom_capacity_is_respected() {
    let engine = CorrelationEngine::with_capacity(3).unwrap();
    compute(&engine, &wide(5, 40));
    let stats = engine.cache_stats();
    assert_eq!(stats.capacity, 3);
    assert_eq!(stats.size, 3);
}

#[test]
fn cache_is_shared_across_series_sets() {
    let engine = CorrelationEngine::new();
    let full = wide(5, 40);
    compute(&engine, &full);
    let misses = engine.cache_stats().misses;

    // A different set with the same symbol names reuses cached pairs.
    let subset = wide(3, 40);
    compute(&engine, &subset);
    let stats = engine.cache_stats();
    assert_eq!(stats.misses, misses);
    assert_eq!(stats.hits, 3);
}

/// X and Y on 40 rows; Z is absent on the last 5, where Y breaks away from X.
fn gapped() -> SeriesSet {
    SeriesSet::from_rows((0..40).map(|i| {
        let x = i as f64;
        let (y, z) = if i < 35 {
            (x, Some((x * 0.7).sin()))
        } else {
            (-100.0 * x, None)
        };
        vec![
            ("X".to_string(), Some(x)),
            ("Y".to_string(), Some(y)),
            ("Z".to_string(), z),
        ]
    }))
    .unwrap()
}

fn compute_with(
    engine: &CorrelationEngine,
    data: &SeriesSet,
    config: &CorrelationConfig,
) -> marlin_correlation::CorrelationMatrix {
    let mut sink = NullSink;
    let mut reporter = Reporter::new(&mut sink, CancelToken::new());
    engine.compute(data, config, &mut reporter).unwrap().into_parts().0
}

#[test]
fn listwise_run_does_not_leak_into_pairwise_results() {
    let data = gapped();
    let listwise_cfg = CorrelationConfig::new().with_pairwise(false);

    let fresh = compute_with(&CorrelationEngine::new(), &data, &CorrelationConfig::default());
    let fresh_xy = fresh.get("X", "Y").unwrap();
    assert!(fresh_xy < 0.9, "pairwise X/Y = {fresh_xy}");

    let engine = CorrelationEngine::new();
    let listwise = compute_with(&engine, &data, &listwise_cfg);
    assert!((listwise.get("X", "Y").unwrap() - 1.0).abs() < 1e-12);
    assert_eq!(engine.cache_stats().size, 0);

    let after = compute_with(&engine, &data, &CorrelationConfig::default());
    assert_eq!(after.get("X", "Y"), Some(fresh_xy));
    assert_eq!(after, fresh);
}

#[test]
fn pairwise_entries_are_not_reused_by_listwise_runs() {
    let data = gapped();
    let engine = CorrelationEngine::new();
    compute_with(&engine, &data, &CorrelationConfig::default());
    let hits_before = engine.cache_stats().hits;

    let listwise = compute_with(&engine, &data, &CorrelationConfig::new().with_pairwise(false));
    assert!((listwise.get("X", "Y").unwrap() - 1.0).abs() < 1e-12);
    assert_eq!(engine.cache_stats().hits, hits_before);
}
