//! Test fixtures for events and sinks.

use std::sync::Arc;

use herald_events::{Event, EventRef, EventSink};
use tokio::sync::mpsc;

/// A plain event with owned fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestEvent {
    /// Emitting component.
    pub source: String,
    /// Event type name.
    pub kind: String,
    /// Human-readable message.
    pub message: String,
}

impl TestEvent {
    /// Create a test event with an empty message.
    #[must_use]
    pub fn new(source: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            kind: kind.into(),
            message: String::new(),
        }
    }

    /// Set the message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Wrap the event for sending.
    #[must_use]
    pub fn into_ref(self) -> EventRef {
        Arc::new(self)
    }
}

impl Event for TestEvent {
    fn event_type(&self) -> &str {
        &self.kind
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Create a ready-to-send event from `source` of type `kind`.
#[must_use]
pub fn test_event(source: &str, kind: &str) -> EventRef {
    TestEvent::new(source, kind).into_ref()
}

/// Create a ready-to-send event carrying a message.
#[must_use]
pub fn test_event_with_message(source: &str, kind: &str, message: &str) -> EventRef {
    TestEvent::new(source, kind).with_message(message).into_ref()
}

/// Create a subscriber channel with the given buffer size.
#[must_use]
pub fn test_sink(capacity: usize) -> (EventSink, mpsc::Receiver<EventRef>) {
    mpsc::channel(capacity)
}
