use obs_hotkey_core::actions::ToggleStyle;
use serde::{Deserialize, Serialize};

/// Built-in action behaviour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionsConfig {
    /// `server-side` sends the endpoint's toggle requests; `status-query`
    /// reads the recording status first and sends the explicit request.
    #[serde(default)]
    pub toggle_style: ToggleStyle,
}
