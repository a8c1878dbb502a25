//! Herald Events - In-process publish/subscribe event bus with wildcard routing.
//!
//! This crate provides:
//! - The [`Event`] capability producers implement
//! - [`Pattern`], a case-insensitive matcher over `source.type` routing keys
//! - [`EventBus`], which queues events and fans them out to subscriber channels
//!
//! # Architecture
//!
//! ```text
//! producers ──send──► [bounded queue] ──► dispatcher task
//!                                            │ routing key = source.type
//!                                            │ read-lock registry
//!                                            ├─try_send─► sink of "http.*"
//!                                            ├─try_send─► sink of "*.Error"
//!                                            └─try_send─► sink of "*"
//! ```
//!
//! Delivery is best effort: a subscriber whose channel is full misses the
//! event, and neither the producer nor other subscribers wait for it.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use herald_events::{Event, EventBus};
//! use tokio::sync::mpsc;
//!
//! #[derive(Debug)]
//! struct WorkerError;
//!
//! impl Event for WorkerError {
//!     fn event_type(&self) -> &str { "WorkerError" }
//!     fn source(&self) -> &str { "http" }
//!     fn message(&self) -> &str { "worker exited with status 1" }
//! }
//!
//! # async fn example() {
//! let (bus, id) = EventBus::new().connect();
//!
//! let (tx, mut rx) = mpsc::channel(16);
//! bus.subscribe(&id, "http.*", tx).unwrap();
//!
//! bus.send(Arc::new(WorkerError)).await;
//!
//! let event = rx.recv().await.unwrap();
//! assert_eq!(event.event_type(), "WorkerError");
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod bus;
mod config;
mod error;
mod event;
mod pattern;
mod subscriber;

pub use bus::{DispatchStats, EventBus};
pub use config::{BusConfig, DEFAULT_QUEUE_CAPACITY, QUEUE_CAPACITY_ENV};
pub use error::{BusError, BusResult};
pub use event::{Event, EventRef, routing_key};
pub use pattern::Pattern;
pub use subscriber::{EventSink, MATCH_ALL, SubscriberId, SubscriberRegistry};
