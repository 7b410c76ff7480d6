use std::time::Duration;

/// Retries after the first failed startup connect.
pub const DEFAULT_MAX_RETRIES: u32 = 10;
/// Delay between startup retries.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(30);
/// Delay between background reconnect checks once retries are exhausted.
pub const DEFAULT_DEGRADED_INTERVAL: Duration = Duration::from_secs(60);

/// Fixed-delay reconnection policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Attempts after the initial one before entering degraded mode.
    pub max_retries: u32,
    /// Delay between startup attempts.
    pub retry_delay: Duration,
    /// Delay between degraded-mode attempts.
    pub degraded_interval: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            degraded_interval: DEFAULT_DEGRADED_INTERVAL,
        }
    }
}
