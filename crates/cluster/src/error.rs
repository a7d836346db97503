//! Error types for the marlin-cluster crate.

use marlin_progress::Cancelled;

/// Error type for all fallible operations in the marlin-cluster crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClusterError {
    /// Returned when no points are supplied.
    #[error("no points provided")]
    EmptyPoints,

    /// Returned when k is zero.
    #[error("k must be >= 1, got {k}")]
    InvalidK {
        /// The invalid k value.
        k: usize,
    },

    /// Returned when max_iterations is zero.
    #[error("max_iterations must be >= 1, got {max_iterations}")]
    InvalidMaxIterations {
        /// The invalid iteration cap.
        max_iterations: usize,
    },

    /// Returned when the convergence tolerance is non-finite or negative.
    #[error("tolerance must be finite and non-negative, got {tolerance}")]
    InvalidTolerance {
        /// The invalid tolerance.
        tolerance: f64,
    },

    /// Returned when the first point has no coordinates.
    #[error("points must have at least one dimension")]
    ZeroDimension,

    /// Returned when a point's length differs from the first point's.
    #[error("point {index} has dimension {got}, expected {expected}")]
    DimensionMismatch {
        /// Index of the offending point.
        index: usize,
        /// Dimension of the first point.
        expected: usize,
        /// Dimension of the offending point.
        got: usize,
    },

    /// Returned when a point contains NaN or infinity.
    #[error("point {index} contains a non-finite coordinate")]
    NonFinitePoint {
        /// Index of the offending point.
        index: usize,
    },

    /// Returned when the run was cancelled at a checkpoint.
    #[error("clustering cancelled")]
    Cancelled,
}

impl From<Cancelled> for ClusterError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}
