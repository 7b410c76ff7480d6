//! Action identifier to operation dispatch table.

use crate::{
    actions::{Action, ActionOutcome, display_label},
    protocol::request_type::{
        SAVE_REPLAY_BUFFER, START_RECORDING, STOP_RECORDING, TOGGLE_RECORD,
        TOGGLE_RECORD_PAUSE, TOGGLE_STREAM,
    },
    supervisor::Supervisor,
    transport::Connector,
};

use std::{collections::BTreeMap, sync::Arc};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Action identifier: start or stop recording.
pub const TOGGLE_RECORDING: &str = "toggle_recording";
/// Action identifier: pause or resume recording.
pub const TOGGLE_PAUSE: &str = "toggle_pause";
/// Action identifier: start or stop streaming.
pub const TOGGLE_STREAMING: &str = "toggle_streaming";
/// Action identifier: start recording.
pub const START_RECORDING_ACTION: &str = "start_recording";
/// Action identifier: stop recording.
pub const STOP_RECORDING_ACTION: &str = "stop_recording";
/// Action identifier: save the replay buffer.
pub const SAVE_REPLAY_ACTION: &str = "save_replay_buffer";

/// How the recording toggles decide what to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToggleStyle {
    /// Send `ToggleRecord`/`ToggleRecordPause` and let the endpoint decide.
    #[default]
    ServerSide,
    /// Query `GetRecordStatus`, then send the explicit start/stop/pause/resume.
    StatusQuery,
}

/// Registered actions, keyed by identifier. At most one action per id.
#[derive(Debug, Default, Clone)]
pub struct ActionRegistry {
    actions: BTreeMap<String, Action>,
}

impl ActionRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action, returning any action it replaced.
    pub fn register(&mut self, action: Action) -> Option<Action> {
        debug!(action_id = %action.id(), "Registering action");
        self.actions.insert(action.id().to_string(), action)
    }

    /// Look up an action.
    pub fn get(&self, action_id: &str) -> Option<&Action> {
        self.actions.get(action_id)
    }

    /// Registered identifiers in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    /// Number of registered actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether no actions are registered.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// The built-in recording and streaming actions, bound to `supervisor`.
    pub fn builtin<C: Connector>(
        supervisor: Arc<Supervisor<C>>,
        style: ToggleStyle,
        labels: &BTreeMap<String, String>,
    ) -> Self {
        let mut registry = Self::new();

        match style {
            ToggleStyle::ServerSide => {
                registry.register(request_action(
                    TOGGLE_RECORDING,
                    labels,
                    &supervisor,
                    TOGGLE_RECORD,
                ));
                registry.register(request_action(
                    TOGGLE_PAUSE,
                    labels,
                    &supervisor,
                    TOGGLE_RECORD_PAUSE,
                ));
            }
            ToggleStyle::StatusQuery => {
                let sup = Arc::clone(&supervisor);
                registry.register(Action::new(
                    TOGGLE_RECORDING,
                    display_label(TOGGLE_RECORDING, labels),
                    move || {
                        let sup = Arc::clone(&sup);
                        async move { sup.toggle_recording().await.map(ActionOutcome::from) }
                    },
                ));

                let sup = Arc::clone(&supervisor);
                registry.register(Action::new(
                    TOGGLE_PAUSE,
                    display_label(TOGGLE_PAUSE, labels),
                    move || {
                        let sup = Arc::clone(&sup);
                        async move { sup.toggle_pause().await.map(ActionOutcome::from) }
                    },
                ));
            }
        }

        registry.register(request_action(
            TOGGLE_STREAMING,
            labels,
            &supervisor,
            TOGGLE_STREAM,
        ));
        registry.register(request_action(
            START_RECORDING_ACTION,
            labels,
            &supervisor,
            START_RECORDING,
        ));
        registry.register(request_action(
            STOP_RECORDING_ACTION,
            labels,
            &supervisor,
            STOP_RECORDING,
        ));
        registry.register(request_action(
            SAVE_REPLAY_ACTION,
            labels,
            &supervisor,
            SAVE_REPLAY_BUFFER,
        ));

        registry
    }
}

/// Action that sends a single parameterless request.
fn request_action<C: Connector>(
    action_id: &str,
    labels: &BTreeMap<String, String>,
    supervisor: &Arc<Supervisor<C>>,
    request_type: &'static str,
) -> Action {
    let sup = Arc::clone(supervisor);
    Action::new(action_id, display_label(action_id, labels), move || {
        let sup = Arc::clone(&sup);
        async move {
            sup.call(request_type, None).await?;
            Ok(ActionOutcome::Sent { request_type })
        }
    })
}
