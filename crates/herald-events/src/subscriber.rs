//! Subscriber identifiers and the subscription registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, trace};
use uuid::Uuid;

use crate::error::{BusError, BusResult};
use crate::event::EventRef;
use crate::pattern::Pattern;

/// Pattern used by [`SubscriberRegistry::subscribe_all`].
pub const MATCH_ALL: &str = "*";

/// Channel a subscriber hands to the bus. The subscriber keeps the receiver.
pub type EventSink = mpsc::Sender<EventRef>;

/// Name of one logical consumer.
///
/// Any non-blank string works as an id; [`SubscriberId::new`] hands out
/// globally unique ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriberId(String);

impl SubscriberId {
    /// Create a fresh, globally unique subscriber ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SubscriberId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SubscriberId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SubscriberId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One pattern registered by a subscriber.
#[derive(Debug, Clone)]
pub(crate) struct Subscription {
    pattern: String,
    matcher: Pattern,
    sink: EventSink,
}

/// Deliveries made while fanning out a single event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct FanOut {
    pub(crate) delivered: u64,
    pub(crate) dropped: u64,
}

/// Registry of pattern subscriptions, keyed by subscriber ID.
///
/// Writers (subscribe, unsubscribe) are exclusive; readers (`count`, the
/// dispatcher's fan-out) share the lock.
#[derive(Default)]
pub struct SubscriberRegistry {
    subscribers: RwLock<HashMap<String, Vec<Subscription>>>,
}

impl fmt::Debug for SubscriberRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberRegistry")
            .field("subscriber_count", &self.count())
            .finish()
    }
}

impl SubscriberRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Vec<Subscription>>> {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Vec<Subscription>>> {
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Subscribe to every event.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::InvalidArgument`] if the sink is closed or the ID is blank.
    pub fn subscribe_all(&self, subscriber_id: &str, sink: EventSink) -> BusResult<()> {
        self.subscribe(subscriber_id, MATCH_ALL, sink)
    }

    /// Subscribe to events whose routing key matches `pattern`.
    ///
    /// Identical patterns are not deduplicated: subscribing twice delivers twice.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::InvalidArgument`] if the sink is closed or the ID or
    /// pattern is blank, and [`BusError::InvalidPattern`] if the pattern does
    /// not compile. The registry is untouched on error.
    pub fn subscribe(&self, subscriber_id: &str, pattern: &str, sink: EventSink) -> BusResult<()> {
        if sink.is_closed() {
            return Err(BusError::InvalidArgument(
                "sink channel is closed".to_string(),
            ));
        }

        let id = subscriber_id.trim();
        if id.is_empty() {
            return Err(BusError::InvalidArgument(
                "subscriber id must not be empty".to_string(),
            ));
        }

        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Err(BusError::InvalidArgument(
                "pattern must not be empty".to_string(),
            ));
        }

        let matcher = Pattern::compile(pattern)?;

        self.write()
            .entry(id.to_string())
            .or_default()
            .push(Subscription {
                pattern: pattern.to_string(),
                matcher,
                sink,
            });

        debug!(subscriber_id = %id, pattern = %pattern, "Subscription added");
        Ok(())
    }

    /// Remove every subscription held by `subscriber_id`.
    ///
    /// Unknown IDs are ignored.
    pub fn unsubscribe(&self, subscriber_id: &str) {
        let id = subscriber_id.trim();
        if let Some(removed) = self.write().remove(id) {
            debug!(
                subscriber_id = %id,
                subscriptions = removed.len(),
                "Subscriber removed"
            );
        }
    }

    /// Remove the subscriptions of `subscriber_id` registered with exactly `pattern`.
    ///
    /// The comparison is on the pattern text as registered and is case
    /// sensitive, unlike matching: `HTTP.*` does not remove `http.*`.
    /// Removing the last pattern removes the subscriber.
    pub fn unsubscribe_pattern(&self, subscriber_id: &str, pattern: &str) {
        let id = subscriber_id.trim();
        let pattern = pattern.trim();

        let mut subscribers = self.write();
        let Some(subscriptions) = subscribers.get_mut(id) else {
            return;
        };

        let before = subscriptions.len();
        subscriptions.retain(|s| s.pattern != pattern);
        let removed = before.saturating_sub(subscriptions.len());

        if subscriptions.is_empty() {
            subscribers.remove(id);
        }

        if removed > 0 {
            debug!(subscriber_id = %id, pattern = %pattern, removed, "Subscription removed");
        }
    }

    /// Number of distinct subscribers holding at least one subscription.
    #[must_use]
    pub fn count(&self) -> usize {
        self.read().len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Patterns held by `subscriber_id`, in registration order.
    #[must_use]
    pub fn patterns(&self, subscriber_id: &str) -> Vec<String> {
        self.read()
            .get(subscriber_id.trim())
            .map(|subs| subs.iter().map(|s| s.pattern.clone()).collect())
            .unwrap_or_default()
    }

    /// Offer `event` to every subscription whose pattern matches `key`.
    ///
    /// `key` must already be lower case. Sends never wait: a full or closed
    /// sink loses this event and nothing else.
    pub(crate) fn fan_out(&self, key: &str, event: &EventRef) -> FanOut {
        let mut outcome = FanOut::default();
        let subscribers = self.read();

        for (id, subscriptions) in subscribers.iter() {
            for sub in subscriptions.iter().filter(|s| s.matcher.matches_lowercase(key)) {
                match sub.sink.try_send(Arc::clone(event)) {
                    Ok(()) => {
                        outcome.delivered = outcome.delivered.saturating_add(1);
                        trace!(subscriber_id = %id, pattern = %sub.pattern, routing_key = %key, "Event delivered");
                    },
                    Err(TrySendError::Full(_)) => {
                        outcome.dropped = outcome.dropped.saturating_add(1);
                        trace!(subscriber_id = %id, pattern = %sub.pattern, routing_key = %key, "Sink full, event dropped");
                    },
                    Err(TrySendError::Closed(_)) => {
                        outcome.dropped = outcome.dropped.saturating_add(1);
                        trace!(subscriber_id = %id, pattern = %sub.pattern, routing_key = %key, "Sink closed, event dropped");
                    },
                }
            }
        }

        outcome
    }
}
