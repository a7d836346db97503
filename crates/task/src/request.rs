//! Typed task requests and per-engine defaults.

use marlin_cluster::KMeansConfig;
use marlin_correlation::{CorrelationConfig, SeriesSet};
use marlin_optimize::{
    GradientDescentConfig, NelderMeadConfig, Objective, OptimizationMethod, OptimizerConfig,
};

use crate::kind::TaskKind;

/// A validated unit of work for one engine.
///
/// # Example
///
/// ```
/// use marlin_optimize::{Objective, OptimizerConfig};
/// use marlin_task::{Task, TaskKind};
///
/// let task = Task::Optimization {
///     objective: Objective::from_fn(|x| x.iter().map(|v| v * v).sum()),
///     initial_guess: vec![3.0, -4.0],
///     config: OptimizerConfig::default(),
/// };
/// assert_eq!(task.kind(), TaskKind::Optimization);
/// ```
#[derive(Debug, Clone)]
pub enum Task {
    /// Compute a correlation matrix.
    CorrelationMatrix {
        /// Input series, one column per symbol.
        data: SeriesSet,
        /// Deletion mode and sample threshold.
        config: CorrelationConfig,
    },
    /// Run K-means.
    KmeansClustering {
        /// Points of equal dimension.
        points: Vec<Vec<f64>>,
        /// Cluster count and stopping rules.
        config: KMeansConfig,
        /// Fixes the K-means++ draw; `None` uses OS entropy.
        seed: Option<u64>,
    },
    /// Minimise an objective.
    Optimization {
        /// Function to minimise.
        objective: Objective,
        /// Starting point; its length sets the dimension.
        initial_guess: Vec<f64>,
        /// Method and solver settings.
        config: OptimizerConfig,
    },
    /// Report correlation cache statistics.
    CacheStats,
    /// Empty the correlation cache.
    ClearCache,
}

impl Task {
    /// Returns the wire kind of this task.
    pub fn kind(&self) -> TaskKind {
        match self {
            Self::CorrelationMatrix { .. } => TaskKind::CorrelationMatrix,
            Self::KmeansClustering { .. } => TaskKind::KmeansClustering,
            Self::Optimization { .. } => TaskKind::Optimization,
            Self::CacheStats => TaskKind::CacheStats,
            Self::ClearCache => TaskKind::ClearCache,
        }
    }
}

/// A task tagged with the host's correlation id.
#[derive(Debug, Clone)]
pub struct TaskRequest {
    /// Identifier echoed on every message produced for this task.
    pub correlation_id: String,
    /// The work to perform.
    pub task: Task,
}

impl TaskRequest {
    /// Creates a request.
    pub fn new(correlation_id: impl Into<String>, task: Task) -> Self {
        Self {
            correlation_id: correlation_id.into(),
            task,
        }
    }
}

/// Engine settings applied when a wire request leaves an option unset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskDefaults {
    /// Correlation defaults.
    pub correlation: CorrelationConfig,
    /// K-means defaults.
    pub clustering: KMeansConfig,
    /// Method used when `options.method` is absent.
    pub method: OptimizationMethod,
    /// Gradient-descent defaults.
    pub gradient_descent: GradientDescentConfig,
    /// Nelder-Mead defaults.
    pub nelder_mead: NelderMeadConfig,
    /// K-means seed used when a request does not carry one.
    pub seed: Option<u64>,
}

impl TaskDefaults {
    /// Returns the optimizer configuration for `method`.
    pub fn optimizer(&self, method: OptimizationMethod) -> OptimizerConfig {
        match method {
            OptimizationMethod::GradientDescent => {
                OptimizerConfig::GradientDescent(self.gradient_descent.clone())
            }
            OptimizationMethod::NelderMead => OptimizerConfig::NelderMead(self.nelder_mead.clone()),
        }
    }
}
