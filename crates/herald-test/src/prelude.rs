//! Prelude module - commonly used test helpers.
//!
//! Use `use herald_test::prelude::*;` in test modules.

pub use crate::fixtures::{TestEvent, test_event, test_event_with_message, test_sink};
pub use crate::harness::{
    DEFAULT_WAIT, assert_silent, drain, event_types, expect_event, init_test_logging,
    recv_within,
};
