//! Integration tests for routing events through the bus.
//!
//! Tests that events reach exactly the subscribers whose patterns match the
//! `source.type` routing key, in the order they were sent.

use herald_events::{EventBus, routing_key};
use herald_test::prelude::*;

/// Sink used to learn when the dispatcher has moved past an event.
fn probe_sink(bus: &EventBus) -> tokio::sync::mpsc::Receiver<herald_events::EventRef> {
    let (sink, rx) = test_sink(64);
    bus.subscribe_all("probe", sink).unwrap();
    rx
}

#[tokio::test]
async fn test_source_pattern_receives_matching_events_in_order() {
    init_test_logging();
    let bus = EventBus::new();
    let (sink, mut rx) = test_sink(4);
    bus.subscribe("A", "http.*", sink).unwrap();

    bus.send(test_event("http", "Start")).await;
    bus.send(test_event("http", "Stop")).await;
    bus.send(test_event("http", "Error")).await;
    bus.send(test_event("rpc", "Error")).await;

    let mut received = Vec::new();
    for _ in 0..3 {
        received.push(expect_event(&mut rx).await);
    }
    assert_eq!(event_types(&received), vec!["Start", "Stop", "Error"]);
    assert!(received.iter().all(|e| e.source() == "http"));

    assert!(recv_within(&mut rx, std::time::Duration::from_millis(50)).await.is_none());
}

#[tokio::test]
async fn test_type_pattern_spans_sources() {
    let bus = EventBus::new();
    let (sink, mut rx) = test_sink(8);
    bus.subscribe("errors", "*.WorkerError", sink).unwrap();
    let mut probe = probe_sink(&bus);

    bus.send(test_event("http", "WorkerError")).await;
    bus.send(test_event("http", "Other")).await;
    bus.send(test_event("rpc", "WorkerError")).await;

    for _ in 0..3 {
        expect_event(&mut probe).await;
    }

    let received = drain(&mut rx);
    let sources: Vec<_> = received.iter().map(|e| e.source().to_string()).collect();
    assert_eq!(sources, vec!["http", "rpc"]);
}

#[tokio::test]
async fn test_unmatched_events_reach_nobody() {
    let bus = EventBus::new();
    let (http_sink, mut http_rx) = test_sink(4);
    let (rpc_sink, mut rpc_rx) = test_sink(4);
    bus.subscribe("http", "http.*", http_sink).unwrap();
    bus.subscribe("rpc", "rpc.*", rpc_sink).unwrap();
    let mut probe = probe_sink(&bus);

    bus.send(test_event("jobs", "Start")).await;
    expect_event(&mut probe).await;

    assert_silent(&mut http_rx);
    assert_silent(&mut rpc_rx);
}

#[tokio::test]
async fn test_matching_ignores_case() {
    let bus = EventBus::new();
    let (sink, mut rx) = test_sink(4);
    bus.subscribe("a", "HTTP.*", sink).unwrap();

    bus.send(test_event("http", "WorkerError")).await;

    let event = expect_event(&mut rx).await;
    assert_eq!(routing_key(&*event), "http.WorkerError");
}

#[tokio::test]
async fn test_subscribe_all_equals_star_pattern() {
    let bus = EventBus::new();
    let (all_sink, mut all_rx) = test_sink(8);
    let (star_sink, mut star_rx) = test_sink(8);
    bus.subscribe_all("all", all_sink).unwrap();
    bus.subscribe("star", "*", star_sink).unwrap();

    let sent = [("http", "Start"), ("rpc", "WorkerError"), ("Jobs", "done")];
    for (source, kind) in sent {
        bus.send(test_event(source, kind)).await;
    }

    for (source, kind) in sent {
        let a = expect_event(&mut all_rx).await;
        let b = expect_event(&mut star_rx).await;
        assert_eq!((a.source(), a.event_type()), (source, kind));
        assert_eq!((b.source(), b.event_type()), (source, kind));
    }
}

#[tokio::test]
async fn test_subscribers_share_the_same_event() {
    let bus = EventBus::new();
    let (first_sink, mut first_rx) = test_sink(1);
    let (second_sink, mut second_rx) = test_sink(1);
    bus.subscribe("first", "*.Ready", first_sink).unwrap();
    bus.subscribe("second", "db.*", second_sink).unwrap();

    bus.send(test_event_with_message("db", "Ready", "pool warmed up")).await;

    let first = expect_event(&mut first_rx).await;
    let second = expect_event(&mut second_rx).await;
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(first.message(), "pool warmed up");
}

#[tokio::test]
async fn test_literal_pattern_matches_prefix_and_suffix() {
    let bus = EventBus::new();
    let (sink, mut rx) = test_sink(8);
    bus.subscribe("a", "http.Stop", sink).unwrap();
    let mut probe = probe_sink(&bus);

    bus.send(test_event("http", "Stop")).await;
    bus.send(test_event("http", "NonStop")).await;
    bus.send(test_event("http", "StopAll")).await;
    bus.send(test_event("rpc", "Stop")).await;

    for _ in 0..4 {
        expect_event(&mut probe).await;
    }

    assert_eq!(event_types(&drain(&mut rx)), vec!["Stop", "NonStop"]);
}

#[tokio::test]
async fn test_try_send_is_dispatched_like_send() {
    let bus = EventBus::new();
    let (sink, mut rx) = test_sink(4);
    bus.subscribe("a", "*", sink).unwrap();

    bus.try_send(test_event("http", "Start")).unwrap();
    assert_eq!(expect_event(&mut rx).await.event_type(), "Start");
}
