//! Reconnection supervision around the session manager.
//!
//! The supervisor is the only owner of the [`SessionManager`]. Every
//! operation, including reconnects, runs under one async mutex so frames of
//! concurrent actions never interleave on the wire.

use crate::{
    CoreResult,
    protocol::Response,
    session::{RecordState, SessionManager, ToggleOutcome},
    supervisor::ReconnectPolicy,
    transport::Connector,
};

use serde_json::Value;
use tokio::sync::{Mutex, MutexGuard, watch};
use tracing::{info, instrument, warn};

/// Keeps a control session alive and recovers it on failure.
pub struct Supervisor<C: Connector> {
    manager: Mutex<SessionManager<C>>,
    policy: ReconnectPolicy,
}

impl<C: Connector> Supervisor<C> {
    /// Wrap a disconnected session manager.
    pub fn new(manager: SessionManager<C>, policy: ReconnectPolicy) -> Self {
        Self {
            manager: Mutex::new(manager),
            policy,
        }
    }

    /// Reconnection policy in effect.
    pub fn policy(&self) -> ReconnectPolicy {
        self.policy
    }

    /// Whether a session is currently ready.
    pub async fn is_connected(&self) -> bool {
        self.manager.lock().await.is_ready()
    }

    /// Connect at startup, then keep reconnecting in the background until
    /// `shutdown_rx` fires.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn run(&self, shutdown_rx: watch::Receiver<bool>) {
        if !self.connect_with_retries().await {
            warn!(
                interval_secs = self.policy.degraded_interval.as_secs(),
                "Hotkeys stay active; retrying in the background"
            );
        }
        self.run_background(shutdown_rx).await;
    }

    /// One immediate attempt, then up to `max_retries` more separated by
    /// `retry_delay`. Returns whether a session is ready.
    #[instrument(skip(self))]
    pub async fn connect_with_retries(&self) -> bool {
        let max_retries = self.policy.max_retries;

        for attempt in 0..=max_retries {
            if attempt > 0 {
                info!(
                    delay_secs = self.policy.retry_delay.as_secs(),
                    "Waiting before retrying"
                );
                tokio::time::sleep(self.policy.retry_delay).await;
            }

            let mut manager = self.manager.lock().await;
            if manager.is_ready() {
                return true;
            }

            match manager.connect().await {
                Ok(()) => return true,
                Err(e) => warn!(
                    retry = attempt,
                    max_retries,
                    url = %manager.endpoint(),
                    error = %e,
                    "Connection attempt failed"
                ),
            }
        }

        warn!(
            attempts = max_retries + 1,
            "Could not connect to the control endpoint"
        );
        false
    }

    /// Degraded-mode loop: every `degraded_interval`, reconnect if needed.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn run_background(&self, mut shutdown_rx: watch::Receiver<bool>) {
        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Reconnection monitor shutting down");
                    break;
                }
                _ = tokio::time::sleep(self.policy.degraded_interval) => {
                    self.reconnect_if_needed().await;
                }
            }
        }
    }

    /// Attempt one connect if no session is ready.
    pub async fn reconnect_if_needed(&self) -> bool {
        let mut manager = self.manager.lock().await;
        if manager.is_ready() {
            return true;
        }

        info!(url = %manager.endpoint(), "Attempting to reconnect");
        match manager.connect().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Background reconnect failed");
                false
            }
        }
    }

    /// Send one request, reconnecting once if the session is missing or lost.
    pub async fn call(&self, request_type: &str, params: Option<Value>) -> CoreResult<Response> {
        let (mut manager, reconnected) = self.lock_ready().await?;
        let result = manager.call(request_type, params).await;
        Self::recover_after(&mut manager, reconnected, result).await
    }

    /// Send a request batch, with the same recovery as [`call`](Self::call).
    pub async fn call_batch(
        &self,
        requests: Vec<(String, Option<Value>)>,
        halt_on_failure: bool,
    ) -> CoreResult<Vec<Response>> {
        let (mut manager, reconnected) = self.lock_ready().await?;
        let result = manager.call_batch(requests, halt_on_failure).await;
        Self::recover_after(&mut manager, reconnected, result).await
    }

    /// Fetch the recording state.
    pub async fn record_status(&self) -> CoreResult<RecordState> {
        let (mut manager, reconnected) = self.lock_ready().await?;
        let result = manager.record_status().await;
        Self::recover_after(&mut manager, reconnected, result).await
    }

    /// Status-query recording toggle. The lock is held across both round
    /// trips, so local actions cannot interleave.
    pub async fn toggle_recording(&self) -> CoreResult<ToggleOutcome> {
        let (mut manager, reconnected) = self.lock_ready().await?;
        let result = manager.toggle_recording().await;
        Self::recover_after(&mut manager, reconnected, result).await
    }

    /// Status-query pause toggle.
    pub async fn toggle_pause(&self) -> CoreResult<ToggleOutcome> {
        let (mut manager, reconnected) = self.lock_ready().await?;
        let result = manager.toggle_pause().await;
        Self::recover_after(&mut manager, reconnected, result).await
    }

    /// Close the session.
    pub async fn shutdown(&self) {
        self.manager.lock().await.disconnect().await;
    }

    /// Lock the manager, spending the one reconnect attempt if it is not ready.
    /// The flag tells whether that attempt was spent.
    async fn lock_ready(&self) -> CoreResult<(MutexGuard<'_, SessionManager<C>>, bool)> {
        let mut manager = self.manager.lock().await;
        if manager.is_ready() {
            return Ok((manager, false));
        }

        info!(url = %manager.endpoint(), "Not connected, reconnecting");
        manager.connect().await?;
        Ok((manager, true))
    }

    /// After a failure that dropped the session, make one reconnect attempt
    /// unless the call already spent it. The failed request is not replayed.
    async fn recover_after<T>(
        manager: &mut SessionManager<C>,
        reconnected: bool,
        result: CoreResult<T>,
    ) -> CoreResult<T> {
        if reconnected {
            if result.is_err() && !manager.is_ready() {
                warn!("Session lost again right after reconnecting");
            }
            return result;
        }

        if result.is_err() && !manager.is_ready() {
            info!("Session lost during request, reconnecting");
            if let Err(e) = manager.connect().await {
                warn!(error = %e, "Reconnect after failed request did not succeed");
            }
        }
        result
    }
}
