//! Routes "action triggered" events from key capture to registered actions.

use crate::{
    CoreResult, SessionError,
    actions::{ActionOutcome, ActionRegistry},
};

use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

/// Invokes registry actions for incoming trigger events.
///
/// Cheap to clone. Repeated triggers are neither deduplicated nor queued;
/// the session lock is the only serialization point.
#[derive(Debug, Clone)]
pub struct InputEventDispatcher {
    registry: Arc<ActionRegistry>,
}

impl InputEventDispatcher {
    /// Dispatcher over `registry`.
    pub fn new(registry: Arc<ActionRegistry>) -> Self {
        Self { registry }
    }

    /// Run the action bound to `action_id` in the calling task.
    ///
    /// Returns `None` when no such action is registered.
    #[instrument(skip(self))]
    pub async fn on_action(&self, action_id: &str) -> Option<CoreResult<ActionOutcome>> {
        let Some(action) = self.registry.get(action_id) else {
            debug!("No action registered, event ignored");
            return None;
        };

        info!(label = %action.label(), "Action triggered");
        let result = action.invoke().await;

        match &result {
            Ok(ActionOutcome::Sent { request_type }) => {
                info!(request_type, "Action completed");
            }
            Ok(ActionOutcome::Skipped { reason }) => {
                info!(reason, "Action skipped");
            }
            Err(e @ (SessionError::Remote { .. } | SessionError::QueryFailed { .. })) => {
                warn!(error = %e, "Action failed");
            }
            Err(e) => {
                error!(error = %e, "Action failed, control endpoint unreachable");
            }
        }

        Some(result)
    }
}
