use std::fmt;

use serde::{Deserialize, Serialize};

/// Where key presses come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaptureBackend {
    /// OS-level global hotkey hook.
    #[default]
    Hook,
    /// Raw keyboard devices (Linux evdev). Works under Wayland, needs read
    /// access to `/dev/input`.
    InputDevice,
}

impl fmt::Display for CaptureBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureBackend::Hook => write!(f, "hook"),
            CaptureBackend::InputDevice => write!(f, "input-device"),
        }
    }
}

/// Key capture settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Capture backend.
    #[serde(default)]
    pub backend: CaptureBackend,
}
