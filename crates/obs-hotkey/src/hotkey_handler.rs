//! Hands key triggers to the action dispatcher.
//!
//! Each trigger runs in its own task so a slow or unreachable endpoint never
//! holds up the command loop. Triggers are not deduplicated; overlapping
//! actions serialize on the session lock.

use obs_hotkey_core::InputEventDispatcher;
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

/// Spawns one dispatch task per trigger.
#[derive(Debug, Clone)]
pub struct HotkeyHandler {
    dispatcher: InputEventDispatcher,
}

impl HotkeyHandler {
    pub fn new(dispatcher: InputEventDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Dispatch `action_id`. Outcomes are logged by the dispatcher.
    #[instrument(skip(self))]
    pub fn handle_trigger(&self, action_id: String) -> JoinHandle<()> {
        let dispatcher = self.dispatcher.clone();
        tokio::spawn(async move {
            if dispatcher.on_action(&action_id).await.is_none() {
                debug!(action_id = %action_id, "Trigger for unregistered action");
            }
        })
    }
}
