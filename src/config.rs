//! Adapter configuration.

use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_OPERATION_TIMEOUT;
use crate::constants::PATH_SEPARATOR;
use crate::errors::Error;
use crate::errors::Result;

/// Tunables of the write path and the operation bridge.
///
/// A plain value: deserializable from whatever configuration source the
/// embedding application uses, adjustable through the `with_` setters, and
/// validated once when the producer is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Node path targeted when the inbound message names none.
    /// Empty means every message must name its own target.
    #[serde(default)]
    pub path: String,

    /// Recover from a write against a missing node by creating the node
    /// once, with the same payload. Never more than one fallback per write.
    #[serde(default)]
    pub create_on_missing: bool,

    /// After a successful write, reply with the target's children instead
    /// of the bare write confirmation.
    #[serde(default)]
    pub list_children: bool,

    /// Upper bound, in milliseconds, on one store round trip.
    /// Default value is set via default_operation_timeout_ms() function
    #[serde(default = "default_operation_timeout_ms")]
    pub operation_timeout_ms: u64,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            create_on_missing: false,
            list_children: false,
            operation_timeout_ms: default_operation_timeout_ms(),
        }
    }
}

impl AdapterConfig {
    /// The round-trip bound as a [`Duration`].
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }

    pub fn with_path(
        mut self,
        path: impl Into<String>,
    ) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_create_on_missing(
        mut self,
        create_on_missing: bool,
    ) -> Self {
        self.create_on_missing = create_on_missing;
        self
    }

    pub fn with_list_children(
        mut self,
        list_children: bool,
    ) -> Self {
        self.list_children = list_children;
        self
    }

    pub fn with_operation_timeout(
        mut self,
        bound: Duration,
    ) -> Self {
        self.operation_timeout_ms = bound.as_millis() as u64;
        self
    }

    /// Reject configurations no operation could honor.
    pub fn validate(&self) -> Result<()> {
        if self.operation_timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "operation_timeout_ms must be greater than 0".into(),
            ));
        }
        if !self.path.is_empty() && !self.path.starts_with(PATH_SEPARATOR) {
            return Err(Error::InvalidConfig(format!(
                "default path must be absolute, got '{}'",
                self.path
            )));
        }
        Ok(())
    }
}

fn default_operation_timeout_ms() -> u64 {
    DEFAULT_OPERATION_TIMEOUT.as_millis() as u64
}
