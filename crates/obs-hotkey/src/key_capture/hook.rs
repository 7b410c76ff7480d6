//! Global hotkey hook backend.
//!
//! Hotkeys are registered with the OS through `global-hotkey`. The `tao`
//! event loop must own the main thread: it pumps the messages needed for
//! `WM_HOTKEY` delivery on Windows and the run loop on macOS.

use crate::{
    AppCommand, AppError, AppResult,
    key_capture::{KeyCapture, KeyDescriptor, Modifier},
};

use std::{collections::HashMap, panic::Location};

use error_location::ErrorLocation;
use global_hotkey::{
    GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState,
    hotkey::{Code, HotKey, Modifiers},
};
use obs_hotkey_core::actions::ActiveBinding;
use tao::event_loop::{ControlFlow, EventLoop};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

const HOOK_KEYS: &[(&str, Code)] = &[
    ("scroll lock", Code::ScrollLock),
    ("pause", Code::Pause),
    ("home", Code::Home),
    ("end", Code::End),
    ("page up", Code::PageUp),
    ("page down", Code::PageDown),
    ("insert", Code::Insert),
    ("delete", Code::Delete),
    ("print screen", Code::PrintScreen),
    ("esc", Code::Escape),
    ("escape", Code::Escape),
    ("enter", Code::Enter),
    ("space", Code::Space),
    ("tab", Code::Tab),
    ("backspace", Code::Backspace),
    ("up", Code::ArrowUp),
    ("down", Code::ArrowDown),
    ("left", Code::ArrowLeft),
    ("right", Code::ArrowRight),
    ("f1", Code::F1),
    ("f2", Code::F2),
    ("f3", Code::F3),
    ("f4", Code::F4),
    ("f5", Code::F5),
    ("f6", Code::F6),
    ("f7", Code::F7),
    ("f8", Code::F8),
    ("f9", Code::F9),
    ("f10", Code::F10),
    ("f11", Code::F11),
    ("f12", Code::F12),
    ("a", Code::KeyA),
    ("b", Code::KeyB),
    ("c", Code::KeyC),
    ("d", Code::KeyD),
    ("e", Code::KeyE),
    ("f", Code::KeyF),
    ("g", Code::KeyG),
    ("h", Code::KeyH),
    ("i", Code::KeyI),
    ("j", Code::KeyJ),
    ("k", Code::KeyK),
    ("l", Code::KeyL),
    ("m", Code::KeyM),
    ("n", Code::KeyN),
    ("o", Code::KeyO),
    ("p", Code::KeyP),
    ("q", Code::KeyQ),
    ("r", Code::KeyR),
    ("s", Code::KeyS),
    ("t", Code::KeyT),
    ("u", Code::KeyU),
    ("v", Code::KeyV),
    ("w", Code::KeyW),
    ("x", Code::KeyX),
    ("y", Code::KeyY),
    ("z", Code::KeyZ),
    ("0", Code::Digit0),
    ("1", Code::Digit1),
    ("2", Code::Digit2),
    ("3", Code::Digit3),
    ("4", Code::Digit4),
    ("5", Code::Digit5),
    ("6", Code::Digit6),
    ("7", Code::Digit7),
    ("8", Code::Digit8),
    ("9", Code::Digit9),
];

/// Hotkey for `descriptor`, modifiers included.
pub(crate) fn hook_key(descriptor: &str) -> Option<HotKey> {
    let parsed = KeyDescriptor::parse(descriptor)?;
    let code = HOOK_KEYS
        .iter()
        .find(|(name, _)| *name == parsed.key)
        .map(|(_, code)| *code)?;

    let modifiers = parsed
        .modifiers
        .iter()
        .fold(Modifiers::empty(), |acc, m| match m {
            Modifier::Ctrl => acc | Modifiers::CONTROL,
            Modifier::Shift => acc | Modifiers::SHIFT,
            Modifier::Alt => acc | Modifiers::ALT,
            Modifier::Super => acc | Modifiers::SUPER,
        });

    Some(HotKey::new(
        (!modifiers.is_empty()).then_some(modifiers),
        code,
    ))
}

/// Global hotkey capture on the main thread.
pub(crate) struct HookCapture {
    event_loop: EventLoop<()>,
    manager: GlobalHotKeyManager,
    actions: HashMap<u32, String>,
}

impl HookCapture {
    /// Create the event loop and hotkey manager.
    ///
    /// Must be called on the main thread.
    #[track_caller]
    #[instrument]
    pub(crate) fn new() -> AppResult<Self> {
        let event_loop = EventLoop::new();

        let manager = GlobalHotKeyManager::new().map_err(|e| AppError::KeyCapture {
            reason: format!("Failed to create hotkey manager: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Ok(Self {
            event_loop,
            manager,
            actions: HashMap::new(),
        })
    }
}

impl KeyCapture for HookCapture {
    type Key = HotKey;

    fn name(&self) -> &'static str {
        "hook"
    }

    fn resolve(&self, descriptor: &str) -> Option<HotKey> {
        hook_key(descriptor)
    }

    #[track_caller]
    fn register(&mut self, binding: &ActiveBinding<HotKey>) -> AppResult<()> {
        self.manager
            .register(binding.key)
            .map_err(|e| AppError::HotkeyRegistrationFailed {
                reason: format!("Failed to register {}: {}", binding.descriptor, e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.actions
            .insert(binding.key.id(), binding.action_id.clone());

        info!(hotkey = %binding.descriptor, "Global hotkey registered");

        Ok(())
    }

    fn run(self, command_tx: mpsc::Sender<AppCommand>) -> AppResult<()> {
        let Self {
            event_loop,
            manager,
            actions,
        } = self;

        // GlobalHotKeyEvent::receiver() is a blocking channel, so one
        // forwarding thread covers every hotkey. It exits once the command
        // channel is closed.
        let receiver = GlobalHotKeyEvent::receiver().clone();
        std::thread::Builder::new()
            .name("hotkey-forwarder".to_string())
            .spawn(move || {
                while let Ok(event) = receiver.recv() {
                    if event.state != HotKeyState::Pressed {
                        continue;
                    }
                    let Some(action_id) = actions.get(&event.id) else {
                        debug!(hotkey_id = event.id, "Unbound hotkey event");
                        continue;
                    };
                    let command = AppCommand::Trigger {
                        action_id: action_id.clone(),
                    };
                    if command_tx.blocking_send(command).is_err() {
                        break;
                    }
                }
            })?;

        event_loop.run(move |_event, _, control_flow| {
            *control_flow = ControlFlow::Wait;

            // Keep the manager alive in the closure so the hotkeys stay registered.
            let _ = &manager;
        })
    }
}
