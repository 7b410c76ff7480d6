mod reconnect_policy;
#[allow(clippy::module_inception)]
mod supervisor;

pub use {
    reconnect_policy::{
        DEFAULT_DEGRADED_INTERVAL, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY, ReconnectPolicy,
    },
    supervisor::Supervisor,
};
