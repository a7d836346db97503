//! Dispatcher from typed tasks to the compute engines.

use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

use marlin_cluster::{KMeansResult, kmeans};
use marlin_correlation::{CacheStats, CorrelationEngine, CorrelationResult};
use marlin_optimize::{OptimizationResult, minimize};
use marlin_progress::{CancelToken, ProgressEvent, ProgressSink, Reporter};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::error::{ErrorKind, TaskError};
use crate::kind::TaskKind;
use crate::message::Message;
use crate::request::{Task, TaskDefaults, TaskRequest};
use crate::wire::WireRequest;

/// Lifecycle of one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Received, not yet dispatched.
    Idle,
    /// Dispatched to an engine.
    Running,
    /// Engine returned a result.
    Completed,
    /// Validation or the engine failed.
    Failed,
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        })
    }
}

/// Routes requests to the correlation, clustering and optimization engines.
///
/// Stateless between requests apart from the correlation cache, which lives
/// in the owned [`CorrelationEngine`].
#[derive(Debug, Default)]
pub struct TaskEngine {
    correlation: CorrelationEngine,
    defaults: TaskDefaults,
}

impl TaskEngine {
    /// Creates an engine with a default-capacity correlation cache.
    pub fn new(defaults: TaskDefaults) -> Self {
        Self {
            correlation: CorrelationEngine::new(),
            defaults,
        }
    }

    /// Creates an engine around an existing correlation engine.
    pub fn with_correlation_engine(correlation: CorrelationEngine, defaults: TaskDefaults) -> Self {
        Self {
            correlation,
            defaults,
        }
    }

    /// Returns the defaults applied to wire requests.
    pub fn defaults(&self) -> &TaskDefaults {
        &self.defaults
    }

    /// Returns the correlation engine.
    pub fn correlation(&self) -> &CorrelationEngine {
        &self.correlation
    }

    /// Decodes and executes a wire request, returning its terminal message.
    ///
    /// Decoding failures are reported without dispatching to any engine,
    /// after a `-1` sentinel for the requested kind.
    pub fn handle(&self, request: WireRequest, cancel: CancelToken, sink: &mut dyn ProgressSink) -> Message {
        let correlation_id = request.correlation_id.clone();
        let kind = request.task_type.parse::<TaskKind>().ok();
        match request.decode(&self.defaults) {
            Ok(req) => self.execute(req, cancel, sink),
            Err(e) => {
                warn!(correlation_id = %correlation_id, error = %e, "rejected request");
                // Unknown kinds have no phase and are rejected without a sentinel.
                if let Some(kind) = kind {
                    emit_failure(sink, kind, &e);
                }
                Message::error(correlation_id, &e)
            }
        }
    }

    /// Executes a typed request, returning its terminal message.
    ///
    /// Progress events go to `sink`. Exactly one `RESULT` or `ERROR` is
    /// returned; a failed task never yields a partial result.
    #[tracing::instrument(skip(self, request, cancel, sink), fields(correlation_id = %request.correlation_id, kind = %request.task.kind()))]
    pub fn execute(&self, request: TaskRequest, cancel: CancelToken, sink: &mut dyn ProgressSink) -> Message {
        let TaskRequest {
            correlation_id,
            task,
        } = request;

        let mut state = TaskState::Idle;
        debug!(%state, "task received");

        state = TaskState::Running;
        debug!(%state, "task dispatched");
        let outcome = self.run(task, cancel, sink);

        match outcome {
            Ok(result) => {
                state = TaskState::Completed;
                info!(%state, "task finished");
                Message::result(correlation_id, result)
            }
            Err(e) => {
                state = TaskState::Failed;
                warn!(%state, kind = %e.kind(), error = %e.message(), "task finished");
                Message::error(correlation_id, &e)
            }
        }
    }

    /// Runs a task and encodes its result as JSON.
    ///
    /// Panics inside an engine are caught and reported as
    /// [`ErrorKind::ComputationFailure`] with the panic message as trace.
    /// Every failure, including cancellation before dispatch, emits the `-1`
    /// sentinel to `sink`.
    pub fn run(&self, task: Task, cancel: CancelToken, sink: &mut dyn ProgressSink) -> Result<Value, TaskError> {
        let kind = task.kind();
        if cancel.is_cancelled() {
            let e = TaskError::cancelled();
            emit_failure(sink, kind, &e);
            return Err(e);
        }
        match catch_unwind(AssertUnwindSafe(|| self.dispatch(task, cancel, &mut *sink))) {
            Ok(result) => result,
            Err(payload) => {
                let e = TaskError::new(
                    ErrorKind::ComputationFailure,
                    "engine panicked during computation",
                )
                .with_trace(panic_message(payload.as_ref()));
                emit_failure(sink, kind, &e);
                Err(e)
            }
        }
    }

    fn dispatch(&self, task: Task, cancel: CancelToken, sink: &mut dyn ProgressSink) -> Result<Value, TaskError> {
        let mut reporter = Reporter::new(sink, cancel);
        match task {
            Task::CorrelationMatrix { data, config } => {
                let result = self.correlation.compute(&data, &config, &mut reporter)?;
                Ok(correlation_json(&result))
            }
            Task::KmeansClustering {
                points,
                config,
                seed,
            } => {
                let mut rng = match seed {
                    Some(s) => StdRng::seed_from_u64(s),
                    None => StdRng::from_os_rng(),
                };
                let result = kmeans(&points, &config, &mut rng, &mut reporter)?;
                Ok(kmeans_json(&result))
            }
            Task::Optimization {
                objective,
                initial_guess,
                config,
            } => {
                let result = minimize(&objective, &initial_guess, &config, &mut reporter)?;
                Ok(optimization_json(&result))
            }
            Task::CacheStats => Ok(cache_stats_json(&self.correlation.cache_stats())),
            Task::ClearCache => {
                self.correlation.clear_cache();
                Ok(json!({ "message": "correlation cache cleared" }))
            }
        }
    }
}

/// Emits the `-1` sentinel for a failure raised outside the engines.
fn emit_failure(sink: &mut dyn ProgressSink, kind: TaskKind, error: &TaskError) {
    sink.emit(ProgressEvent::failed(
        kind.phase(),
        json!({ "error": error.message() }),
    ));
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// `{symbols, matrix, metadata}`.
pub fn correlation_json(result: &CorrelationResult) -> Value {
    let meta = result.metadata();
    json!({
        "symbols": result.matrix().symbols(),
        "matrix": result.matrix().to_nested(),
        "metadata": {
            "symbols": meta.symbols,
            "method": meta.method.as_str(),
            "dataPoints": meta.data_points,
            "minPeriods": meta.min_periods,
            "cacheSize": meta.cache_size,
        },
    })
}

/// `{centroids, assignments, iterations, converged, inertia, silhouetteScore, clusterCounts}`.
pub fn kmeans_json(result: &KMeansResult) -> Value {
    json!({
        "centroids": result.centroids(),
        "assignments": result.assignments(),
        "iterations": result.iterations(),
        "converged": result.converged(),
        "inertia": result.inertia(),
        "silhouetteScore": result.silhouette_score(),
        "clusterCounts": result.cluster_counts(),
    })
}

/// `{solution, value, iterations, converged, method}`.
pub fn optimization_json(result: &OptimizationResult) -> Value {
    json!({
        "solution": result.solution(),
        "value": result.value(),
        "iterations": result.iterations(),
        "converged": result.converged(),
        "method": result.method().as_str(),
    })
}

/// `{correlationCacheSize, maxCacheSize, hits, misses}`.
pub fn cache_stats_json(stats: &CacheStats) -> Value {
    json!({
        "correlationCacheSize": stats.size,
        "maxCacheSize": stats.capacity,
        "hits": stats.hits,
        "misses": stats.misses,
    })
}
