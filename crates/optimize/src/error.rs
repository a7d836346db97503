//! Error types for the marlin-optimize crate.

use marlin_progress::Cancelled;

/// Error type for all fallible operations in the marlin-optimize crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OptimizeError {
    /// Returned when the initial guess has no coordinates.
    #[error("initial guess is empty")]
    EmptyInitialGuess,

    /// Returned when the initial guess contains NaN or infinity.
    #[error("initial guess coordinate {index} is not finite")]
    NonFiniteInitialGuess {
        /// Index of the offending coordinate.
        index: usize,
    },

    /// Returned when the learning rate is non-finite or not positive.
    #[error("learning_rate must be finite and > 0, got {learning_rate}")]
    InvalidLearningRate {
        /// The invalid learning rate.
        learning_rate: f64,
    },

    /// Returned when max_iterations is zero.
    #[error("max_iterations must be >= 1, got {max_iterations}")]
    InvalidMaxIterations {
        /// The invalid iteration cap.
        max_iterations: usize,
    },

    /// Returned when a convergence tolerance is non-finite or negative.
    #[error("tolerance must be finite and non-negative, got {tolerance}")]
    InvalidTolerance {
        /// The invalid tolerance.
        tolerance: f64,
    },

    /// Returned when a finite-difference or simplex step is non-finite or
    /// not positive.
    #[error("step must be finite and > 0, got {step}")]
    InvalidStep {
        /// The invalid step.
        step: f64,
    },

    /// Returned when an optimization method name is not recognised.
    #[error("unknown optimization method '{method}'")]
    UnknownMethod {
        /// The unrecognised name.
        method: String,
    },

    /// Returned when a described objective cannot be built for the given
    /// dimension.
    #[error("invalid objective: {reason}")]
    InvalidObjective {
        /// What is wrong with the description.
        reason: String,
    },

    /// Returned when the objective or its gradient stops being finite.
    #[error("objective is not finite at iteration {iteration}")]
    NonFiniteObjective {
        /// Iteration at which the value was observed.
        iteration: usize,
    },

    /// Returned when the underlying solver fails.
    #[error("optimization failed: {reason}")]
    OptimizationFailed {
        /// Solver-provided description.
        reason: String,
    },

    /// Returned when the run was cancelled at a checkpoint.
    #[error("optimization cancelled")]
    Cancelled,
}

impl From<Cancelled> for OptimizeError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_empty_initial_guess() {
        assert_eq!(
            OptimizeError::EmptyInitialGuess.to_string(),
            "initial guess is empty"
        );
    }

    #[test]
    fn error_invalid_learning_rate() {
        let e = OptimizeError::InvalidLearningRate { learning_rate: -0.5 };
        assert_eq!(e.to_string(), "learning_rate must be finite and > 0, got -0.5");
    }

    #[test]
    fn error_unknown_method() {
        let e = OptimizeError::UnknownMethod {
            method: "bfgs".into(),
        };
        assert_eq!(e.to_string(), "unknown optimization method 'bfgs'");
    }

    #[test]
    fn error_non_finite_objective() {
        let e = OptimizeError::NonFiniteObjective { iteration: 12 };
        assert_eq!(e.to_string(), "objective is not finite at iteration 12");
    }

    #[test]
    fn error_from_cancelled() {
        assert!(matches!(
            OptimizeError::from(Cancelled),
            OptimizeError::Cancelled
        ));
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<OptimizeError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<OptimizeError>();
    }
}
