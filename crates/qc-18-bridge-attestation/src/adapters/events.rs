//! Event sink adapters.

use crate::domain::events::AttestationEvent;
use crate::ports::outbound::EventSink;

/// Keeps every emitted event, for tests and tooling.
#[derive(Debug, Clone, Default)]
pub struct RecordingEventSink {
    events: Vec<AttestationEvent>,
}

impl RecordingEventSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events in emission order.
    pub fn events(&self) -> &[AttestationEvent] {
        &self.events
    }

    /// Take the recorded events, leaving the sink empty.
    pub fn drain(&mut self) -> Vec<AttestationEvent> {
        std::mem::take(&mut self.events)
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&mut self, event: AttestationEvent) {
        self.events.push(event);
    }
}

/// Logs events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&mut self, event: AttestationEvent) {
        let attributes = event
            .attributes()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ");
        tracing::info!("[qc-18] event {} {}", event.name(), attributes);
    }
}
