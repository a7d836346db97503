//! Message-driven task protocol over the Marlin compute engines.
//!
//! A host sends [`WireRequest`]s (`{type, correlationId, payload, options}`)
//! and receives [`Message`]s: zero or more `PROGRESS`, then exactly one
//! `RESULT` or `ERROR` tagged with the same correlation id.
//!
//! | Type | Payload | Options |
//! |------|---------|---------|
//! | `CORRELATION_MATRIX` | `[{symbol: number \| null}]` | `method`, `pairwise`, `minPeriods` |
//! | `KMEANS_CLUSTERING` | `[[f64]]` | `k`, `maxIterations`, `tolerance`, `seed` |
//! | `OPTIMIZATION` | `{objective, constraints?, initialGuess}` | `method`, `maxIterations`, `tolerance`, `learningRate`, `step`, `reportEvery`, `initialStep` |
//! | `CACHE_STATS` | none | none |
//! | `CLEAR_CACHE` | none | none |
//!
//! [`TaskEngine`] executes requests on the calling thread; [`Worker`] moves
//! it onto a dedicated thread with a request queue and per-task
//! cancellation.
//!
//! ```
//! use marlin_progress::{CancelToken, NullSink};
//! use marlin_task::{Message, TaskDefaults, TaskEngine, WireRequest};
//! use serde_json::json;
//!
//! let engine = TaskEngine::new(TaskDefaults::default());
//! let request = WireRequest::new("KMEANS_CLUSTERING", "req-1", json!([[0.0], [0.1], [9.0]]))
//!     .with_options(json!({"k": 2, "seed": 7}));
//!
//! match engine.handle(request, CancelToken::new(), &mut NullSink) {
//!     Message::Result { result, .. } => assert_eq!(result["clusterCounts"].as_array().unwrap().len(), 2),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

mod engine;
mod error;
mod kind;
mod message;
mod request;
mod wire;
mod worker;

pub use engine::{
    TaskEngine, TaskState, cache_stats_json, correlation_json, kmeans_json, optimization_json,
};
pub use error::{ErrorKind, TaskError};
pub use kind::TaskKind;
pub use message::{ErrorBody, Message};
pub use request::{Task, TaskDefaults, TaskRequest};
pub use wire::WireRequest;
pub use worker::Worker;
