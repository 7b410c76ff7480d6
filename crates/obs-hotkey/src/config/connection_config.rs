use crate::config::{default_request_timeout_secs, default_url};

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Control endpoint connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// WebSocket URL of the control endpoint.
    #[serde(default = "default_url")]
    pub url: String,
    /// Seconds to wait for any single frame before dropping the session.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl ConnectionConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}
