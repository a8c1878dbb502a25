//! Helpers for waiting on and inspecting subscriber channels.

use std::time::Duration;

use herald_events::EventRef;
use herald_telemetry::{LogConfig, LogTarget};
use tokio::sync::mpsc;

/// How long helpers wait for an event before giving up.
pub const DEFAULT_WAIT: Duration = Duration::from_secs(1);

/// Install test-captured logging at `debug`, once per process.
///
/// Later calls are ignored, so every test may call this.
pub fn init_test_logging() {
    let config = LogConfig::new("debug")
        .with_target(LogTarget::Test)
        .without_ansi()
        .with_directive("herald_events=trace");
    let _ = herald_telemetry::setup_logging(&config);
}

/// Wait up to `wait` for the next event.
///
/// Returns `None` on timeout or when every sender is gone.
pub async fn recv_within(rx: &mut mpsc::Receiver<EventRef>, wait: Duration) -> Option<EventRef> {
    tokio::time::timeout(wait, rx.recv()).await.ok().flatten()
}

/// Wait for the next event.
///
/// # Panics
///
/// Panics if nothing arrives within [`DEFAULT_WAIT`].
pub async fn expect_event(rx: &mut mpsc::Receiver<EventRef>) -> EventRef {
    match recv_within(rx, DEFAULT_WAIT).await {
        Some(event) => event,
        None => panic!("no event received within {DEFAULT_WAIT:?}"),
    }
}

/// Take everything already buffered, without waiting.
pub fn drain(rx: &mut mpsc::Receiver<EventRef>) -> Vec<EventRef> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Assert that nothing is buffered.
///
/// Only meaningful once the dispatcher is known to be past the events in
/// question, e.g. after a probe subscriber has seen a later event.
///
/// # Panics
///
/// Panics if an event is waiting in the channel.
pub fn assert_silent(rx: &mut mpsc::Receiver<EventRef>) {
    if let Ok(event) = rx.try_recv() {
        panic!(
            "expected no event, got {}.{}",
            event.source(),
            event.event_type()
        );
    }
}

/// Event types of `events`, in order.
#[must_use]
pub fn event_types(events: &[EventRef]) -> Vec<String> {
    events.iter().map(|e| e.event_type().to_string()).collect()
}
