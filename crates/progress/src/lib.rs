//! Progress streaming and cooperative cancellation for long-running engines.
//!
//! Engines never talk to the host directly. They hold a [`Reporter`], which
//! wraps a caller-supplied [`ProgressSink`] and a [`CancelToken`]:
//!
//! ```text
//! engine loop
//!   ├─ reporter.report(percent, phase, data)   → sink.emit(ProgressEvent)
//!   └─ reporter.checkpoint()?                  → cancel check + thread yield
//! ```
//!
//! # Quick start
//!
//! ```
//! use marlin_progress::{CancelToken, Phase, ProgressEvent, Reporter};
//! use serde_json::json;
//!
//! let mut events: Vec<ProgressEvent> = Vec::new();
//! let mut reporter = Reporter::new(&mut events, CancelToken::new());
//! reporter.report(50.0, Phase::Correlation, json!({ "completed": 1 }));
//! assert!(reporter.checkpoint().is_ok());
//! assert_eq!(events.len(), 1);
//! ```

mod cancel;
mod error;
mod event;
mod reporter;
mod sink;

pub use cancel::CancelToken;
pub use error::Cancelled;
pub use event::{FAILED_PERCENT, Phase, ProgressEvent};
pub use reporter::Reporter;
pub use sink::{NullSink, ProgressSink};
