//! Unconstrained minimization of scalar objectives.
//!
//! Two methods share one input/output contract (objective, initial guess,
//! returns solution, value, iterations and a convergence flag):
//!
//! | Method | Entry point | Stops when |
//! |--------|-------------|------------|
//! | Fixed-step gradient descent | [`minimize_gradient_descent`] | gradient L2 norm < tolerance |
//! | Nelder-Mead (argmin) | [`minimize_nelder_mead`] | simplex cost std-dev < tolerance |
//!
//! ```
//! use marlin_optimize::{GradientDescentConfig, Objective, minimize_gradient_descent};
//! use marlin_progress::{CancelToken, NullSink, Reporter};
//!
//! let sphere = Objective::from_fn(|x| x.iter().map(|v| v * v).sum());
//! let mut sink = NullSink;
//! let mut reporter = Reporter::new(&mut sink, CancelToken::new());
//! let result = minimize_gradient_descent(
//!     &sphere,
//!     &[10.0, 10.0],
//!     &GradientDescentConfig::default(),
//!     &mut reporter,
//! )
//! .unwrap();
//! assert!(result.converged());
//! assert!(result.value() < 1e-10);
//! ```

mod config;
mod error;
mod gradient;
mod nelder_mead;
mod objective;
mod result;

pub use config::{GradientDescentConfig, NelderMeadConfig, OptimizationMethod, OptimizerConfig};
pub use error::OptimizeError;
pub use gradient::minimize_gradient_descent;
pub use nelder_mead::minimize_nelder_mead;
pub use objective::{Objective, ObjectiveSpec};
pub use result::OptimizationResult;

use marlin_progress::Reporter;

/// Minimizes `objective` with the method selected by `config`.
///
/// # Errors
///
/// See [`minimize_gradient_descent`] and [`minimize_nelder_mead`].
pub fn minimize(
    objective: &Objective,
    initial_guess: &[f64],
    config: &OptimizerConfig,
    reporter: &mut Reporter<'_>,
) -> Result<OptimizationResult, OptimizeError> {
    match config {
        OptimizerConfig::GradientDescent(c) => {
            minimize_gradient_descent(objective, initial_guess, c, reporter)
        }
        OptimizerConfig::NelderMead(c) => minimize_nelder_mead(objective, initial_guess, c, reporter),
    }
}
