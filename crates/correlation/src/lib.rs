//! Pairwise correlation matrices over named, gappy series.
//!
//! # Quick start
//!
//! ```
//! use marlin_correlation::{CorrelationConfig, CorrelationEngine, SeriesSet};
//! use marlin_progress::{CancelToken, NullSink, Reporter};
//!
//! let data = SeriesSet::from_rows((0..40).map(|i| {
//!     let x = i as f64;
//!     vec![("X", Some(x)), ("Y", Some(-x))]
//! }))
//! .unwrap();
//!
//! let engine = CorrelationEngine::new();
//! let mut sink = NullSink;
//! let mut reporter = Reporter::new(&mut sink, CancelToken::new());
//! let result = engine
//!     .compute(&data, &CorrelationConfig::default(), &mut reporter)
//!     .unwrap();
//! assert!((result.matrix().get("X", "Y").unwrap() + 1.0).abs() < 1e-12);
//! ```
//!
//! # Policies
//!
//! - The diagonal is always `1.0` and never touches the cache.
//! - A pair with fewer than `min_periods` overlapping samples is `0.0` and
//!   is **not** cached, since more data may arrive later.
//! - A zero-variance pair is `0.0` and is cached.
//! - The cache is FIFO-bounded (default 100 pairs) and survives across
//!   calls until [`CorrelationEngine::clear_cache`].

mod cache;
mod config;
mod engine;
mod error;
mod matrix;
mod series;

pub use cache::{CorrelationCache, DEFAULT_CACHE_CAPACITY, PairKey};
pub use config::{CorrelationConfig, CorrelationMethod};
pub use engine::CorrelationEngine;
pub use error::CorrelationError;
pub use matrix::{CacheStats, CorrelationMatrix, CorrelationMetadata, CorrelationResult};
pub use series::SeriesSet;
