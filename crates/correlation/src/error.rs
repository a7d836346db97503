//! Error types for the marlin-correlation crate.

use marlin_progress::Cancelled;

/// Error type for all fallible operations in the marlin-correlation crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CorrelationError {
    /// Returned when the series set has no rows.
    #[error("series set is empty")]
    EmptySeriesSet,

    /// Returned when the first row names no series.
    #[error("series set has no symbols")]
    NoSymbols,

    /// Returned when the same symbol appears twice in the header row.
    #[error("duplicate symbol {symbol:?}")]
    DuplicateSymbol {
        /// The repeated symbol.
        symbol: String,
    },

    /// Returned when a dense row has the wrong number of values.
    #[error("row {row} has {got} values, expected {expected}")]
    RowWidthMismatch {
        /// Index of the offending row.
        row: usize,
        /// Number of symbols.
        expected: usize,
        /// Number of values in the row.
        got: usize,
    },

    /// Returned when a correlation method other than Pearson is requested.
    #[error("unsupported correlation method {method:?}")]
    UnsupportedMethod {
        /// The requested method name.
        method: String,
    },

    /// Returned when `min_periods` is zero.
    #[error("min_periods must be >= 1, got {min_periods}")]
    InvalidMinPeriods {
        /// The invalid value.
        min_periods: usize,
    },

    /// Returned when the cache capacity is zero.
    #[error("cache capacity must be >= 1, got {capacity}")]
    InvalidCapacity {
        /// The invalid capacity.
        capacity: usize,
    },

    /// Returned when the run was cancelled at a checkpoint.
    #[error("correlation cancelled")]
    Cancelled,
}

impl From<Cancelled> for CorrelationError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}
