//! Polling limits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_MAX_POLLS: u32 = 120;
pub const DEFAULT_LOOKUP_RETRIES: u32 = 3;

/// How often and how long to poll a pending app setup.
///
/// `max_polls` caps the total number of status lookups, failed ones
/// included. `lookup_retries` caps consecutive retryable lookup failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollPolicy {
    pub interval_secs: u64,
    pub max_polls: u32,
    pub lookup_retries: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL_SECS,
            max_polls: DEFAULT_MAX_POLLS,
            lookup_retries: DEFAULT_LOOKUP_RETRIES,
        }
    }
}

impl PollPolicy {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn with_max_polls(mut self, max_polls: u32) -> Self {
        self.max_polls = max_polls;
        self
    }

    pub fn with_lookup_retries(mut self, retries: u32) -> Self {
        self.lookup_retries = retries;
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.interval_secs == 0 {
            anyhow::bail!("poll.interval_secs must be greater than zero");
        }
        if self.max_polls == 0 {
            anyhow::bail!("poll.max_polls must be greater than zero");
        }
        Ok(())
    }
}
