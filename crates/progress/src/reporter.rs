//! Progress reporting and cooperative checkpoints.

use serde_json::Value;
use tracing::trace;

use crate::cancel::CancelToken;
use crate::error::Cancelled;
use crate::event::{Phase, ProgressEvent};
use crate::sink::ProgressSink;

/// Per-task handle that engines use to stream progress and observe
/// cancellation.
///
/// Reported percentages are clamped into `[last, 100]`, so the stream for a
/// single task never decreases. The failure sentinel bypasses the clamp.
pub struct Reporter<'a> {
    sink: &'a mut dyn ProgressSink,
    cancel: CancelToken,
    last_percent: f64,
}

impl<'a> Reporter<'a> {
    /// Creates a reporter writing to `sink` and observing `cancel`.
    pub fn new(sink: &'a mut dyn ProgressSink, cancel: CancelToken) -> Self {
        Self {
            sink,
            cancel,
            last_percent: 0.0,
        }
    }

    /// Emits a progress event.
    pub fn report(&mut self, percent: f64, phase: Phase, data: Value) {
        let percent = if percent.is_finite() {
            percent.clamp(self.last_percent, 100.0)
        } else {
            self.last_percent
        };
        self.last_percent = percent;
        self.sink.emit(ProgressEvent::new(percent, phase, data));
    }

    /// Emits the `-1` failure sentinel.
    pub fn fail(&mut self, phase: Phase, data: Value) {
        self.sink.emit(ProgressEvent::failed(phase, data));
    }

    /// Returns `Err(Cancelled)` if cancellation was requested.
    pub fn check_cancelled(&self) -> Result<(), Cancelled> {
        if self.cancel.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }

    /// Suspension point: checks for cancellation, then yields the thread so
    /// the host can drain progress and deliver cancellation.
    pub fn checkpoint(&mut self) -> Result<(), Cancelled> {
        self.check_cancelled()?;
        trace!(percent = self.last_percent, "checkpoint");
        std::thread::yield_now();
        Ok(())
    }

    /// Returns the last reported percentage.
    pub fn last_percent(&self) -> f64 {
        self.last_percent
    }

    /// Returns the token this reporter observes.
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }
}
