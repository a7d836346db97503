//! Correlation matrix engine with a persistent pair cache.

use marlin_progress::{Phase, Reporter};
use parking_lot::Mutex;
use serde_json::json;
use tracing::{debug, trace};

use crate::cache::{CorrelationCache, DEFAULT_CACHE_CAPACITY, PairKey};
use crate::config::CorrelationConfig;
use crate::error::CorrelationError;
use crate::matrix::{CacheStats, CorrelationMatrix, CorrelationMetadata, CorrelationResult};
use crate::series::SeriesSet;

/// Pairs resolved between thread yields.
const PAIRS_PER_YIELD: usize = 256;

/// Computes correlation matrices and memoizes pair results across calls.
///
/// The cache is the engine's only mutable state. It sits behind a mutex
/// that is held for a whole [`compute`](Self::compute) call, so concurrent
/// requests against one engine are serialized.
#[derive(Debug)]
pub struct CorrelationEngine {
    cache: Mutex<CorrelationCache>,
}

impl CorrelationEngine {
    /// Creates an engine with the default cache capacity (100 pairs).
    pub fn new() -> Self {
        Self {
            cache: Mutex::new(CorrelationCache::new(DEFAULT_CACHE_CAPACITY)),
        }
    }

    /// Creates an engine with a custom cache capacity.
    ///
    /// # Errors
    ///
    /// Returns [`CorrelationError::InvalidCapacity`] if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self, CorrelationError> {
        if capacity == 0 {
            return Err(CorrelationError::InvalidCapacity { capacity });
        }
        Ok(Self {
            cache: Mutex::new(CorrelationCache::new(capacity)),
        })
    }

    /// Computes the correlation matrix of `data`.
    ///
    /// Emits one progress event per unique unordered pair and a final 100%
    /// event. On failure a `-1` event is emitted and no matrix is returned.
    /// Listwise runs (`pairwise == false`) neither read nor fill the cache.
    ///
    /// # Errors
    ///
    /// Returns [`CorrelationError`] on invalid configuration or cancellation.
    #[tracing::instrument(skip_all, fields(n_symbols = data.n_symbols(), n_rows = data.n_rows()))]
    pub fn compute(
        &self,
        data: &SeriesSet,
        config: &CorrelationConfig,
        reporter: &mut Reporter<'_>,
    ) -> Result<CorrelationResult, CorrelationError> {
        match self.compute_inner(data, config, reporter) {
            Ok(result) => Ok(result),
            Err(e) => {
                reporter.fail(Phase::Correlation, json!({ "error": e.to_string() }));
                Err(e)
            }
        }
    }

    fn compute_inner(
        &self,
        data: &SeriesSet,
        config: &CorrelationConfig,
        reporter: &mut Reporter<'_>,
    ) -> Result<CorrelationResult, CorrelationError> {
        config.validate()?;
        if data.n_rows() == 0 {
            return Err(CorrelationError::EmptySeriesSet);
        }

        let symbols = data.symbols().to_vec();
        let n = symbols.len();
        let total = n * n.saturating_sub(1) / 2;
        let mask = (!config.pairwise()).then(|| data.complete_rows());

        let mut cache = self.cache.lock();
        let mut matrix = CorrelationMatrix::identity(symbols.clone());
        let mut completed = 0usize;
        let mut computed = 0usize;
        let mut reused = 0usize;
        let mut insufficient = 0usize;

        for i in 0..n {
            for j in (i + 1)..n {
                reporter.check_cancelled()?;

                // Listwise values depend on every symbol's gaps, so only
                // pairwise results are shared through the cache.
                let key = PairKey::new(&symbols[i], &symbols[j]);
                let hit = if mask.is_none() { cache.get(&key) } else { None };
                let (value, cached) = match hit {
                    Some(v) => {
                        reused += 1;
                        (v, true)
                    }
                    None => {
                        let (xs, ys) = data.paired_samples(i, j, mask.as_deref());
                        if xs.len() < config.min_periods() {
                            trace!(a = %symbols[i], b = %symbols[j], n = xs.len(), "insufficient samples");
                            insufficient += 1;
                            (0.0, false)
                        } else {
                            let r = marlin_numeric::pearson(&xs, &ys);
                            if mask.is_none() {
                                if let Some(evicted) = cache.insert(key, r) {
                                    trace!(evicted = ?evicted.names(), "cache eviction");
                                }
                            }
                            computed += 1;
                            (r, false)
                        }
                    }
                };
                matrix.set_pair(i, j, value);

                completed += 1;
                reporter.report(
                    completed as f64 / total as f64 * 100.0,
                    Phase::Correlation,
                    json!({
                        "completed": completed,
                        "total": total,
                        "pair": [&symbols[i], &symbols[j]],
                        "cached": cached,
                    }),
                );
                if completed % PAIRS_PER_YIELD == 0 {
                    reporter.checkpoint()?;
                }
            }
        }

        let cache_size = cache.len();
        drop(cache);

        debug!(
            pairs = total,
            computed, reused, insufficient, cache_size, "correlation matrix complete"
        );
        reporter.report(
            100.0,
            Phase::Correlation,
            json!({ "rows": n, "cols": n }),
        );

        let metadata = CorrelationMetadata {
            symbols,
            method: config.method(),
            data_points: data.n_rows(),
            min_periods: config.min_periods(),
            cache_size,
        };
        Ok(CorrelationResult::new(matrix, metadata))
    }

    /// Returns cache occupancy and hit statistics.
    pub fn cache_stats(&self) -> CacheStats {
        let cache = self.cache.lock();
        CacheStats {
            size: cache.len(),
            capacity: cache.capacity(),
            hits: cache.hits(),
            misses: cache.misses(),
        }
    }

    /// Empties the pair cache.
    pub fn clear_cache(&self) {
        self.cache.lock().clear();
        debug!("correlation cache cleared");
    }
}

impl Default for CorrelationEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use marlin_progress::{CancelToken, NullSink, ProgressEvent};

    fn two_series(n: usize, f: impl Fn(f64) -> f64) -> SeriesSet {
        SeriesSet::from_rows((0..n).map(|i| {
            let x = i as f64 + (i as f64 * 0.7).sin();
            vec![("X", Some(x)), ("Y", Some(f(x)))]
        }))
        .unwrap()
    }

    fn run(engine: &CorrelationEngine, data: &SeriesSet, cfg: &CorrelationConfig) -> CorrelationResult {
        let mut sink = NullSink;
        let mut reporter = Reporter::new(&mut sink, CancelToken::new());
        engine.compute(data, cfg, &mut reporter).unwrap()
    }

    #[test]
    fn test_identical_series() {
        let engine = CorrelationEngine::new();
        let result = run(&engine, &two_series(40, |x| x), &CorrelationConfig::default());
        assert_abs_diff_eq!(result.matrix().get("X", "Y").unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_metadata() {
        let engine = CorrelationEngine::new();
        let result = run(&engine, &two_series(40, |x| 2.0 * x), &CorrelationConfig::default());
        let meta = result.metadata();
        assert_eq!(meta.symbols, vec!["X".to_string(), "Y".to_string()]);
        assert_eq!(meta.data_points, 40);
        assert_eq!(meta.min_periods, 30);
        assert_eq!(meta.cache_size, 1);
    }

    #[test]
    fn test_single_symbol() {
        let engine = CorrelationEngine::new();
        let data = SeriesSet::from_rows(vec![vec![("A", Some(1.0))]]).unwrap();
        let mut events: Vec<ProgressEvent> = Vec::new();
        let result = {
            let mut reporter = Reporter::new(&mut events, CancelToken::new());
            engine
                .compute(&data, &CorrelationConfig::default(), &mut reporter)
                .unwrap()
        };
        assert_eq!(result.matrix().at(0, 0), 1.0);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].percent, 100.0);
    }

    #[test]
    fn test_with_capacity_zero() {
        assert!(matches!(
            CorrelationEngine::with_capacity(0),
            Err(CorrelationError::InvalidCapacity { capacity: 0 })
        ));
    }

    #[test]
    fn test_invalid_config_emits_failure() {
        let engine = CorrelationEngine::new();
        let data = two_series(40, |x| x);
        let cfg = CorrelationConfig::new().with_min_periods(0);
        let mut events: Vec<ProgressEvent> = Vec::new();
        let err = {
            let mut reporter = Reporter::new(&mut events, CancelToken::new());
            engine.compute(&data, &cfg, &mut reporter).unwrap_err()
        };
        assert!(matches!(err, CorrelationError::InvalidMinPeriods { .. }));
        assert_eq!(events.len(), 1);
        assert!(events[0].is_failure());
    }
}
