//! Key capture backends.
//!
//! A backend turns key descriptors from the binding table into its own key
//! type, registers them, then blocks the calling thread forwarding presses
//! of bound keys as [`AppCommand::Trigger`].

mod descriptor;
#[cfg(target_os = "linux")]
pub(crate) mod device;
pub(crate) mod hook;

#[cfg(target_os = "linux")]
pub(crate) use device::DeviceCapture;
pub(crate) use {
    descriptor::{KeyDescriptor, Modifier},
    hook::HookCapture,
};

use crate::{AppCommand, AppResult};

use obs_hotkey_core::actions::ActiveBinding;
use tokio::sync::mpsc;

/// A source of key presses.
pub(crate) trait KeyCapture {
    /// Backend-specific key.
    type Key;

    /// Backend name for logs.
    fn name(&self) -> &'static str;

    /// Map a descriptor to a key, `None` if this backend cannot capture it.
    fn resolve(&self, descriptor: &str) -> Option<Self::Key>;

    /// Start capturing `binding.key` for `binding.action_id`.
    fn register(&mut self, binding: &ActiveBinding<Self::Key>) -> AppResult<()>;

    /// Block the calling thread, sending a trigger for every press of a
    /// registered key. Returns only if capture can no longer continue.
    fn run(self, command_tx: mpsc::Sender<AppCommand>) -> AppResult<()>;
}
