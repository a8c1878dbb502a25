//! Herald Test - Shared test utilities for the Herald event bus.
//!
//! This crate provides event fixtures and receive helpers that can be used
//! across Herald crates as a dev-dependency.
//!
//! # Usage
//!
//! ```rust,ignore
//! use herald_test::{expect_event, test_event, test_sink};
//!
//! #[tokio::test]
//! async fn test_delivery() {
//!     let bus = herald_events::EventBus::new();
//!     let (sink, mut rx) = test_sink(4);
//!     bus.subscribe("a", "http.*", sink).unwrap();
//!
//!     bus.send(test_event("http", "Start")).await;
//!     assert_eq!(expect_event(&mut rx).await.event_type(), "Start");
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

pub mod fixtures;
pub mod harness;

pub use fixtures::*;
pub use harness::*;
