//! Derivative-free minimization via argmin's Nelder-Mead solver.

use std::sync::atomic::{AtomicUsize, Ordering};

use argmin::core::{CostFunction, Executor, State, TerminationReason};
use argmin::solver::neldermead::NelderMead;
use marlin_progress::{CancelToken, Phase, Reporter};
use serde_json::json;
use tracing::debug;

use crate::config::{NelderMeadConfig, OptimizationMethod};
use crate::error::OptimizeError;
use crate::gradient::validate_initial_guess;
use crate::objective::Objective;
use crate::result::OptimizationResult;

/// Objective evaluations between thread yields.
const EVALS_PER_YIELD: usize = 256;

/// Cost function for argmin: the objective, with cancellation checks.
struct SimplexCost<'a> {
    objective: &'a Objective,
    cancel: CancelToken,
    evaluations: AtomicUsize,
}

impl CostFunction for SimplexCost<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, params: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        if self.cancel.is_cancelled() {
            return Err(argmin::core::Error::msg("cancelled"));
        }
        let n = self.evaluations.fetch_add(1, Ordering::Relaxed) + 1;
        if n % EVALS_PER_YIELD == 0 {
            std::thread::yield_now();
        }
        let value = self.objective.evaluate(params);
        // Keep the simplex ordering total.
        Ok(if value.is_finite() { value } else { f64::MAX })
    }
}

/// Builds the initial simplex: the guess plus one vertex per axis offset by
/// `step`.
fn initial_simplex(x0: &[f64], step: f64) -> Vec<Vec<f64>> {
    let mut simplex = Vec::with_capacity(x0.len() + 1);
    simplex.push(x0.to_vec());
    for i in 0..x0.len() {
        let mut vertex = x0.to_vec();
        vertex[i] += step;
        simplex.push(vertex);
    }
    simplex
}

/// Minimizes `objective` from `initial_guess` with Nelder-Mead.
///
/// Emits a 0% event before the search and a 100% event after it. The
/// cancellation token is checked on every objective evaluation.
///
/// # Errors
///
/// Returns [`OptimizeError`] for an invalid configuration or initial guess,
/// a solver failure, or cancellation.
#[tracing::instrument(skip(objective, initial_guess, config, reporter), fields(dim = initial_guess.len(), objective = objective.label()))]
pub fn minimize_nelder_mead(
    objective: &Objective,
    initial_guess: &[f64],
    config: &NelderMeadConfig,
    reporter: &mut Reporter<'_>,
) -> Result<OptimizationResult, OptimizeError> {
    match search(objective, initial_guess, config, reporter) {
        Ok(result) => Ok(result),
        Err(e) => {
            reporter.fail(Phase::Optimization, json!({ "error": e.to_string() }));
            Err(e)
        }
    }
}

fn search(
    objective: &Objective,
    initial_guess: &[f64],
    config: &NelderMeadConfig,
    reporter: &mut Reporter<'_>,
) -> Result<OptimizationResult, OptimizeError> {
    config.validate()?;
    validate_initial_guess(initial_guess)?;
    reporter.check_cancelled()?;

    reporter.report(
        0.0,
        Phase::Optimization,
        json!({
            "method": OptimizationMethod::NelderMead.as_str(),
            "maxIterations": config.max_iterations(),
        }),
    );

    let cost = SimplexCost {
        objective,
        cancel: reporter.cancel_token().clone(),
        evaluations: AtomicUsize::new(0),
    };
    let solver = NelderMead::new(initial_simplex(initial_guess, config.initial_step()))
        .with_sd_tolerance(config.sd_tolerance())
        .map_err(|e| OptimizeError::OptimizationFailed {
            reason: e.to_string(),
        })?;

    let outcome = Executor::new(cost, solver)
        .configure(|state| state.max_iters(config.max_iterations() as u64))
        .run();

    let result = match outcome {
        Ok(result) => result,
        Err(e) => {
            reporter.check_cancelled()?;
            return Err(OptimizeError::OptimizationFailed {
                reason: e.to_string(),
            });
        }
    };

    let state = result.state();
    let solution = state
        .best_param
        .clone()
        .ok_or_else(|| OptimizeError::OptimizationFailed {
            reason: "solver returned no parameters".to_string(),
        })?;
    let iterations = state.get_iter() as usize;
    let converged = matches!(
        state.get_termination_reason(),
        Some(TerminationReason::SolverConverged)
    );

    let value = objective.evaluate(&solution);
    if !value.is_finite() {
        return Err(OptimizeError::NonFiniteObjective {
            iteration: iterations,
        });
    }

    debug!(iterations, converged, value, "nelder-mead complete");
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
        solution,
        value,
        iterations,
        converged,
        OptimizationMethod::NelderMead,
    ))
}
