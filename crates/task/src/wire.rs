//! JSON request format and decoding into typed tasks.
//!
//! ```json
//! {"type": "KMEANS_CLUSTERING", "correlationId": "42",
//!  "payload": [[0.0, 0.0], [9.0, 9.0]], "options": {"k": 2}}
//! ```
//!
//! Unknown `type` values fail with `UnsupportedOperation` before the payload
//! is inspected. Malformed payloads and options fail with `InvalidInput`.
//! Options left out fall back to [`TaskDefaults`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use marlin_correlation::{CorrelationMethod, SeriesSet};
use marlin_optimize::{ObjectiveSpec, OptimizationMethod, OptimizerConfig};

use crate::error::TaskError;
use crate::kind::TaskKind;
use crate::request::{Task, TaskDefaults, TaskRequest};

/// A request as it arrives from the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireRequest {
    /// Task kind name, e.g. `"CORRELATION_MATRIX"`.
    #[serde(rename = "type")]
    pub task_type: String,
    /// Host-chosen identifier echoed on every reply.
    pub correlation_id: String,
    /// Task input; shape depends on `task_type`.
    #[serde(default)]
    pub payload: Value,
    /// Per-request overrides of engine defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
}

impl WireRequest {
    /// Creates a request with no options.
    pub fn new(task_type: impl Into<String>, correlation_id: impl Into<String>, payload: Value) -> Self {
        Self {
            task_type: task_type.into(),
            correlation_id: correlation_id.into(),
            payload,
            options: None,
        }
    }

    /// Sets the options object.
    pub fn with_options(mut self, options: Value) -> Self {
        self.options = Some(options);
        self
    }

    /// Validates the request and converts it into a typed [`TaskRequest`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskError`] with kind `UnsupportedOperation` for an unknown
    /// task type, or `InvalidInput` for a malformed payload or options.
    pub fn decode(self, defaults: &TaskDefaults) -> Result<TaskRequest, TaskError> {
        let kind: TaskKind = self.task_type.parse()?;
        let task = match kind {
            TaskKind::CorrelationMatrix => decode_correlation(self.payload, self.options, defaults)?,
            TaskKind::KmeansClustering => decode_kmeans(self.payload, self.options, defaults)?,
            TaskKind::Optimization => decode_optimization(self.payload, self.options, defaults)?,
            TaskKind::CacheStats => Task::CacheStats,
            TaskKind::ClearCache => Task::ClearCache,
        };
        Ok(TaskRequest::new(self.correlation_id, task))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct CorrelationOptions {
    method: Option<String>,
    pairwise: Option<bool>,
    min_periods: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct KMeansOptions {
    k: Option<usize>,
    max_iterations: Option<usize>,
    tolerance: Option<f64>,
    seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct OptimizationPayload {
    objective: ObjectiveSpec,
    #[serde(default)]
    constraints: Value,
    initial_guess: Vec<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct OptimizationOptions {
    method: Option<String>,
    max_iterations: Option<usize>,
    tolerance: Option<f64>,
    learning_rate: Option<f64>,
    step: Option<f64>,
    report_every: Option<usize>,
    initial_step: Option<f64>,
}

fn parse<T: DeserializeOwned>(value: Value, what: &str) -> Result<T, TaskError> {
    serde_json::from_value(value).map_err(|e| TaskError::invalid_input(format!("invalid {what}: {e}")))
}

fn parse_options<T: DeserializeOwned + Default>(options: Option<Value>) -> Result<T, TaskError> {
    match options {
        None | Some(Value::Null) => Ok(T::default()),
        Some(v) => parse(v, "options"),
    }
}

/// Converts `[{symbol: number | null, ...}, ...]` into a [`SeriesSet`].
fn series_from_json(payload: Value) -> Result<SeriesSet, TaskError> {
    let rows: Vec<Map<String, Value>> = parse(payload, "series payload")?;
    let mut dense = Vec::with_capacity(rows.len());
    for (r, row) in rows.into_iter().enumerate() {
        let mut values = Vec::with_capacity(row.len());
        for (symbol, value) in row {
            let v = match value {
                Value::Null => None,
                Value::Number(n) => n.as_f64(),
                other => {
                    return Err(TaskError::invalid_input(format!(
                        "row {r}, symbol {symbol:?}: expected a number or null, got {other}"
                    )));
                }
            };
            values.push((symbol, v));
        }
        dense.push(values);
    }
    Ok(SeriesSet::from_rows(dense)?)
}

fn decode_correlation(
    payload: Value,
    options: Option<Value>,
    defaults: &TaskDefaults,
) -> Result<Task, TaskError> {
    let opts: CorrelationOptions = parse_options(options)?;
    let mut config = defaults.correlation.clone();
    if let Some(method) = opts.method {
        config = config.with_method(method.parse::<CorrelationMethod>()?);
    }
    if let Some(pairwise) = opts.pairwise {
        config = config.with_pairwise(pairwise);
    }
    if let Some(min_periods) = opts.min_periods {
        config = config.with_min_periods(min_periods);
    }
    config.validate()?;

    let data = series_from_json(payload)?;
    Ok(Task::CorrelationMatrix { data, config })
}

fn decode_kmeans(
    payload: Value,
    options: Option<Value>,
    defaults: &TaskDefaults,
) -> Result<Task, TaskError> {
    let opts: KMeansOptions = parse_options(options)?;
    let mut config = defaults.clustering.clone();
    if let Some(k) = opts.k {
        config = config.with_k(k);
    }
    if let Some(max_iterations) = opts.max_iterations {
        config = config.with_max_iterations(max_iterations);
    }
    if let Some(tolerance) = opts.tolerance {
        config = config.with_tolerance(tolerance);
    }
    config.validate()?;

    let points: Vec<Vec<f64>> = parse(payload, "points payload")?;
    Ok(Task::KmeansClustering {
        points,
        config,
        seed: opts.seed.or(defaults.seed),
    })
}

fn decode_optimization(
    payload: Value,
    options: Option<Value>,
    defaults: &TaskDefaults,
) -> Result<Task, TaskError> {
    let opts: OptimizationOptions = parse_options(options)?;
    let method = match opts.method.as_deref() {
        Some(name) => name.parse::<OptimizationMethod>()?,
        None => defaults.method,
    };

    let config = match method {
        OptimizationMethod::GradientDescent => {
            let mut c = defaults.gradient_descent.clone();
            if let Some(v) = opts.max_iterations {
                c = c.with_max_iterations(v);
            }
            if let Some(v) = opts.tolerance {
                c = c.with_tolerance(v);
            }
            if let Some(v) = opts.learning_rate {
                c = c.with_learning_rate(v);
            }
            if let Some(v) = opts.step {
                c = c.with_step(v);
            }
            if let Some(v) = opts.report_every {
                c = c.with_report_every(v);
            }
            OptimizerConfig::GradientDescent(c)
        }
        OptimizationMethod::NelderMead => {
            let mut c = defaults.nelder_mead.clone();
            if let Some(v) = opts.max_iterations {
                c = c.with_max_iterations(v);
            }
            if let Some(v) = opts.tolerance {
                c = c.with_sd_tolerance(v);
            }
            if let Some(v) = opts.initial_step {
                c = c.with_initial_step(v);
            }
            OptimizerConfig::NelderMead(c)
        }
    };
    config.validate()?;

    let payload: OptimizationPayload = parse(payload, "optimization payload")?;
    if !payload.constraints.is_null() {
        debug!("optimization constraints are ignored");
    }
    let objective = payload.objective.build(payload.initial_guess.len())?;

    Ok(Task::Optimization {
        objective,
        initial_guess: payload.initial_guess,
        config,
    })
}
