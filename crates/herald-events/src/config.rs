//! Bus configuration.
//!
//! Values resolve from lowest to highest precedence: built-in defaults,
//! a TOML document ([`BusConfig::from_toml_str`]), then environment
//! variables ([`BusConfig::apply_env`]).

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{BusError, BusResult};

/// Default capacity of the internal dispatch queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Environment variable overriding [`BusConfig::queue_capacity`].
pub const QUEUE_CAPACITY_ENV: &str = "HERALD_QUEUE_CAPACITY";

/// Configuration for an [`EventBus`](crate::EventBus).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// Number of events the internal queue holds before `send` waits.
    pub queue_capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl BusConfig {
    /// Set the queue capacity.
    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Parse a TOML document. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Config`] if the document is malformed or the
    /// result fails [`validate`](Self::validate).
    pub fn from_toml_str(content: &str) -> BusResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| BusError::Config(format!("failed to parse bus config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment.
    #[must_use]
    pub fn apply_env(self) -> Self {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Unparsable values are logged and ignored.
    #[must_use]
    pub fn apply_env_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(QUEUE_CAPACITY_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(capacity) => self.queue_capacity = capacity,
                Err(e) => warn!(
                    var = QUEUE_CAPACITY_ENV,
                    value = %raw,
                    error = %e,
                    "Ignoring invalid environment override"
                ),
            }
        }
        self
    }

    /// Check that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Config`] if `queue_capacity` is zero.
    pub fn validate(&self) -> BusResult<()> {
        if self.queue_capacity == 0 {
            return Err(BusError::Config(
                "queue_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
