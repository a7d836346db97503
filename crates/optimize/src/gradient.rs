//! Fixed-step gradient descent with finite-difference gradients.

use marlin_numeric::{l2_norm, numerical_gradient};
use marlin_progress::{Phase, Reporter};
use serde_json::json;
use tracing::{debug, trace};

use crate::config::{GradientDescentConfig, OptimizationMethod};
use crate::error::OptimizeError;
use crate::objective::Objective;
use crate::result::OptimizationResult;

/// Checks that the initial guess is non-empty and finite.
pub(crate) fn validate_initial_guess(x: &[f64]) -> Result<(), OptimizeError> {
    if x.is_empty() {
        return Err(OptimizeError::EmptyInitialGuess);
    }
    if let Some(index) = x.iter().position(|v| !v.is_finite()) {
        return Err(OptimizeError::NonFiniteInitialGuess { index });
    }
    Ok(())
}

/// Minimizes `objective` from `initial_guess` by gradient descent.
///
/// Each iteration computes a central-difference gradient (`2·d` objective
/// evaluations) and stops once its L2 norm drops below
/// `config.tolerance()`; otherwise it steps `x -= learning_rate · g`.
/// There is no line search.
///
/// Every `config.report_every()` iterations a progress event carrying the
/// objective value and gradient norm is emitted and the run yields. A final
/// 100% event follows. On failure a `-1` event is emitted.
///
/// # Errors
///
/// Returns [`OptimizeError`] for an invalid configuration or initial guess,
/// a non-finite objective or gradient, or cancellation.
#[tracing::instrument(skip(objective, initial_guess, config, reporter), fields(dim = initial_guess.len(), objective = objective.label()))]
pub fn minimize_gradient_descent(
    objective: &Objective,
    initial_guess: &[f64],
    config: &GradientDescentConfig,
    reporter: &mut Reporter<'_>,
) -> Result<OptimizationResult, OptimizeError> {
    match descend(objective, initial_guess, config, reporter) {
        Ok(result) => Ok(result),
        Err(e) => {
            reporter.fail(Phase::Optimization, json!({ "error": e.to_string() }));
            Err(e)
        }
    }
}

fn descend(
    objective: &Objective,
    initial_guess: &[f64],
    config: &GradientDescentConfig,
    reporter: &mut Reporter<'_>,
) -> Result<OptimizationResult, OptimizeError> {
    config.validate()?;
    validate_initial_guess(initial_guess)?;

    let f = |p: &[f64]| objective.evaluate(p);
    let max_iterations = config.max_iterations();
    let mut x = initial_guess.to_vec();
    let mut iterations = 0;
    let mut converged = false;

    while iterations < max_iterations {
        let gradient = numerical_gradient(f, &x, config.step());
        let norm = l2_norm(&gradient);
        if !norm.is_finite() {
            return Err(OptimizeError::NonFiniteObjective {
                iteration: iterations,
            });
        }
        if norm < config.tolerance() {
            converged = true;
            break;
        }

        for (xi, gi) in x.iter_mut().zip(gradient.iter()) {
            *xi -= config.learning_rate() * gi;
        }
        iterations += 1;

        if iterations % config.report_every() == 0 {
            let value = f(&x);
            if !value.is_finite() {
                return Err(OptimizeError::NonFiniteObjective {
                    iteration: iterations,
                });
            }
            trace!(iterations, value, gradient_norm = norm, "gradient descent");
            reporter.report(
                iterations as f64 / max_iterations as f64 * 100.0,
                Phase::Optimization,
                json!({
                    "iteration": iterations,
                    "value": value,
                    "gradientNorm": norm,
                }),
            );
            reporter.checkpoint()?;
        }
    }

    let value = f(&x);
    if !value.is_finite() {
        return Err(OptimizeError::NonFiniteObjective {
            iteration: iterations,
        });
    }

    debug!(iterations, converged, value, "gradient descent complete");
    reporter.report(
        100.0,
        Phase::Optimization,
        json!({
            "iterations": iterations,
            "converged": converged,
            "value": value,
        }),
    );

    Ok(OptimizationResult::new(
        x,
        value,
        iterations,
        converged,
        OptimizationMethod::GradientDescent,
    ))
}
