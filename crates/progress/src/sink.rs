//! Destinations for progress events.

use crate::event::ProgressEvent;

/// Receives progress events from a running engine.
///
/// Implementations must not block for long: they are called from inside
/// the engine's iteration loop.
pub trait ProgressSink {
    /// Delivers one event.
    fn emit(&mut self, event: ProgressEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&mut self, _event: ProgressEvent) {}
}

/// Collects events in memory, in emission order.
impl ProgressSink for Vec<ProgressEvent> {
    fn emit(&mut self, event: ProgressEvent) {
        self.push(event);
    }
}
