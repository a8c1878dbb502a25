//! The event capability consumed by the bus.

use std::fmt;
use std::sync::Arc;

/// Anything that can travel over the bus.
///
/// Concrete event kinds live with their producers. The bus only ever reads
/// [`source`](Event::source) and [`event_type`](Event::event_type) to build
/// the routing key; [`message`](Event::message) is for consumers.
pub trait Event: Send + Sync + fmt::Debug {
    /// The event's type name, e.g. `WorkerError`.
    fn event_type(&self) -> &str;

    /// Name of the component that emitted the event, e.g. `http`.
    fn source(&self) -> &str;

    /// Human-readable description.
    fn message(&self) -> &str;
}

/// Shared handle to an event. The bus clones the handle, never the event.
pub type EventRef = Arc<dyn Event>;

/// Build the routing key `source.type` that patterns are matched against.
///
/// The key keeps the original casing; matching lower-cases it.
#[must_use]
pub fn routing_key(event: &dyn Event) -> String {
    format!("{}.{}", event.source(), event.event_type())
}
