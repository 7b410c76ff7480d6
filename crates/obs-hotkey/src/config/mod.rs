mod actions_config;
mod capture_config;
#[allow(clippy::module_inception)]
mod config;
mod connection_config;
mod reconnect_config;

pub(crate) use {
    actions_config::ActionsConfig,
    capture_config::{CaptureBackend, CaptureConfig},
    config::Config,
    connection_config::ConnectionConfig,
    reconnect_config::ReconnectConfig,
};

use std::collections::BTreeMap;

use obs_hotkey_core::{
    DEFAULT_DEGRADED_INTERVAL, DEFAULT_MAX_RETRIES, DEFAULT_REQUEST_TIMEOUT, DEFAULT_RETRY_DELAY,
    actions::{TOGGLE_PAUSE, TOGGLE_RECORDING, TOGGLE_STREAMING},
};

pub(crate) const DEFAULT_URL: &str = "ws://localhost:4455";

pub(crate) fn default_url() -> String {
    DEFAULT_URL.to_string()
}

pub(crate) fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT.as_secs()
}

pub(crate) fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

pub(crate) fn default_retry_delay_secs() -> u64 {
    DEFAULT_RETRY_DELAY.as_secs()
}

pub(crate) fn default_degraded_interval_secs() -> u64 {
    DEFAULT_DEGRADED_INTERVAL.as_secs()
}

pub(crate) fn default_bindings() -> BTreeMap<String, String> {
    [
        (TOGGLE_RECORDING, "scroll lock"),
        (TOGGLE_PAUSE, "pause"),
        (TOGGLE_STREAMING, ""),
    ]
    .into_iter()
    .map(|(action, key)| (action.to_string(), key.to_string()))
    .collect()
}

pub(crate) fn default_labels() -> BTreeMap<String, String> {
    [
        (TOGGLE_RECORDING, "Toggle Recording"),
        (TOGGLE_PAUSE, "Toggle Pause/Resume Recording"),
        (TOGGLE_STREAMING, "Toggle Streaming"),
    ]
    .into_iter()
    .map(|(action, label)| (action.to_string(), label.to_string()))
    .collect()
}
