use crate::config::{
    default_degraded_interval_secs, default_max_retries, default_retry_delay_secs,
};

use std::time::Duration;

use obs_hotkey_core::ReconnectPolicy;
use serde::{Deserialize, Serialize};

/// Startup retry and degraded-mode reconnect settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconnectConfig {
    /// Retries after the first failed startup attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Seconds between startup attempts.
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
    /// Seconds between background attempts once startup gave up.
    #[serde(default = "default_degraded_interval_secs")]
    pub degraded_interval_secs: u64,
}

impl ReconnectConfig {
    pub fn policy(&self) -> ReconnectPolicy {
        ReconnectPolicy {
            max_retries: self.max_retries,
            retry_delay: Duration::from_secs(self.retry_delay_secs),
            degraded_interval: Duration::from_secs(self.degraded_interval_secs),
        }
    }
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_delay_secs: default_retry_delay_secs(),
            degraded_interval_secs: default_degraded_interval_secs(),
        }
    }
}
