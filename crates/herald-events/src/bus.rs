//! Event bus: the public API and the dispatcher task.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use crate::config::{BusConfig, DEFAULT_QUEUE_CAPACITY};
use crate::error::{BusError, BusResult};
use crate::event::{EventRef, routing_key};
use crate::subscriber::{EventSink, SubscriberId, SubscriberRegistry};

/// Counters describing what the dispatcher has done so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Events taken off the internal queue.
    pub dispatched: u64,
    /// Copies handed to subscriber sinks.
    pub delivered: u64,
    /// Copies lost because a sink was full or closed.
    pub dropped: u64,
}

#[derive(Debug, Default)]
struct Counters {
    dispatched: AtomicU64,
    delivered: AtomicU64,
    dropped: AtomicU64,
}

/// State shared between bus handles and the dispatcher task.
#[derive(Debug)]
struct Shared {
    registry: SubscriberRegistry,
    counters: Counters,
    capacity: usize,
}

impl Shared {
    fn dispatch(&self, event: &EventRef) {
        let key = routing_key(&**event).to_lowercase();
        let outcome = self.registry.fan_out(&key, event);

        self.counters.dispatched.fetch_add(1, Ordering::Relaxed);
        self.counters
            .delivered
            .fetch_add(outcome.delivered, Ordering::Relaxed);
        self.counters
            .dropped
            .fetch_add(outcome.dropped, Ordering::Relaxed);

        trace!(
            routing_key = %key,
            delivered = outcome.delivered,
            dropped = outcome.dropped,
            "Event dispatched"
        );
    }
}

/// In-process publish/subscribe bus with wildcard routing.
///
/// Producers [`send`](Self::send) events into a bounded queue; a single
/// dispatcher task drains it in FIFO order and offers each event to every
/// subscription whose pattern matches the event's `source.type` key.
/// Offers never wait, so a subscriber whose sink is full misses the event
/// and nobody else notices.
///
/// Create one bus per process and share it: clones are cheap handles onto
/// the same registry and queue. The dispatcher stops once every handle has
/// been dropped.
#[derive(Debug, Clone)]
pub struct EventBus {
    shared: Arc<Shared>,
    queue: mpsc::Sender<EventRef>,
}

impl EventBus {
    /// Create a bus with the default queue capacity.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn new() -> Self {
        Self::start(DEFAULT_QUEUE_CAPACITY)
    }

    /// Create a bus from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Config`] if the configuration is invalid.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn with_config(config: &BusConfig) -> BusResult<Self> {
        config.validate()?;
        Ok(Self::start(config.queue_capacity))
    }

    fn start(capacity: usize) -> Self {
        let (queue, receiver) = mpsc::channel(capacity);
        let shared = Arc::new(Shared {
            registry: SubscriberRegistry::new(),
            counters: Counters::default(),
            capacity,
        });

        tokio::spawn(run_dispatcher(Arc::clone(&shared), receiver));

        Self { shared, queue }
    }

    /// Get a handle to this bus together with a fresh subscriber ID.
    ///
    /// Request one ID per logical consumer and reuse it for all of its patterns.
    #[must_use]
    pub fn connect(&self) -> (Self, SubscriberId) {
        (self.clone(), SubscriberId::new())
    }

    /// Subscribe `sink` to every event.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::InvalidArgument`] if the sink is closed or the ID is blank.
    pub fn subscribe_all(&self, subscriber_id: impl AsRef<str>, sink: EventSink) -> BusResult<()> {
        self.shared
            .registry
            .subscribe_all(subscriber_id.as_ref(), sink)
    }

    /// Subscribe `sink` to events whose routing key matches `pattern`.
    ///
    /// Patterns look like `http.*`, `*.WorkerError`, `*` or `http.WorkerError`
    /// and match case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::InvalidArgument`] if the sink is closed or the ID or
    /// pattern is blank, and [`BusError::InvalidPattern`] if the pattern has
    /// neither `*` nor `.`.
    pub fn subscribe(
        &self,
        subscriber_id: impl AsRef<str>,
        pattern: &str,
        sink: EventSink,
    ) -> BusResult<()> {
        self.shared
            .registry
            .subscribe(subscriber_id.as_ref(), pattern, sink)
    }

    /// Drop every subscription held by `subscriber_id`.
    pub fn unsubscribe(&self, subscriber_id: impl AsRef<str>) {
        self.shared.registry.unsubscribe(subscriber_id.as_ref());
    }

    /// Drop the subscriptions of `subscriber_id` registered with exactly `pattern`.
    ///
    /// See [`SubscriberRegistry::unsubscribe_pattern`] for the comparison rules.
    pub fn unsubscribe_pattern(&self, subscriber_id: impl AsRef<str>, pattern: &str) {
        self.shared
            .registry
            .unsubscribe_pattern(subscriber_id.as_ref(), pattern);
    }

    /// Number of distinct subscribers.
    #[must_use]
    pub fn count(&self) -> usize {
        self.shared.registry.count()
    }

    /// Check if nobody is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.registry.is_empty()
    }

    /// Patterns held by `subscriber_id`.
    #[must_use]
    pub fn patterns(&self, subscriber_id: impl AsRef<str>) -> Vec<String> {
        self.shared.registry.patterns(subscriber_id.as_ref())
    }

    /// Queue an event for dispatch.
    ///
    /// Waits only while the internal queue is full, never on subscribers.
    pub async fn send(&self, event: EventRef) {
        if self.queue.send(event).await.is_err() {
            warn!("Dispatcher is gone, event discarded");
        }
    }

    /// Queue an event without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::QueueFull`] if the internal queue is at capacity.
    pub fn try_send(&self, event: EventRef) -> BusResult<()> {
        match self.queue.try_send(event) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => Err(BusError::QueueFull),
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!("Dispatcher is gone, event discarded");
                Ok(())
            },
        }
    }

    /// Snapshot of the dispatcher counters.
    #[must_use]
    pub fn stats(&self) -> DispatchStats {
        let counters = &self.shared.counters;
        DispatchStats {
            dispatched: counters.dispatched.load(Ordering::Relaxed),
            delivered: counters.delivered.load(Ordering::Relaxed),
            dropped: counters.dropped.load(Ordering::Relaxed),
        }
    }

    /// Capacity of the internal queue.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    /// Get the subscription registry.
    #[must_use]
    pub fn registry(&self) -> &SubscriberRegistry {
        &self.shared.registry
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

async fn run_dispatcher(shared: Arc<Shared>, mut receiver: mpsc::Receiver<EventRef>) {
    debug!(capacity = shared.capacity, "Dispatcher started");
    while let Some(event) = receiver.recv().await {
        shared.dispatch(&event);
    }
    debug!("Dispatcher stopped");
}
