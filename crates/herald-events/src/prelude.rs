//! Prelude module - commonly used types for convenient import.
//!
//! Use `use herald_events::prelude::*;` to import all essential types.

// Event bus
pub use crate::{DispatchStats, EventBus};

// Events
pub use crate::{Event, EventRef, routing_key};

// Subscriptions
pub use crate::{EventSink, Pattern, SubscriberId};

// Configuration and errors
pub use crate::{BusConfig, BusError, BusResult};
