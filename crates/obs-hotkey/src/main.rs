//! OBS Hotkey: global hotkeys that drive OBS Studio over its WebSocket
//! control protocol.

mod app;
mod app_command;
mod config;
mod error;
mod hotkey_handler;
mod key_capture;
#[cfg(test)]
mod tests;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
    hotkey_handler::HotkeyHandler,
};

#[cfg(target_os = "linux")]
use crate::key_capture::DeviceCapture;
use crate::{
    config::{CaptureBackend, Config},
    key_capture::{HookCapture, KeyCapture},
};

use std::sync::Arc;

use obs_hotkey_core::{
    InputEventDispatcher, SessionManager, Supervisor, WsConnector,
    actions::{ActionRegistry, plan_bindings},
};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "obs_hotkey=info,obs_hotkey_core=info";

/// Application entry point.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let result = match config.capture.backend {
        CaptureBackend::Hook => HookCapture::new().and_then(|capture| start(capture, config)),
        #[cfg(target_os = "linux")]
        CaptureBackend::InputDevice => {
            DeviceCapture::new().and_then(|capture| start(capture, config))
        }
        #[cfg(not(target_os = "linux"))]
        CaptureBackend::InputDevice => Err(AppError::KeyCapture {
            reason: "The input-device backend is only available on Linux".to_string(),
            location: error_location::ErrorLocation::from(std::panic::Location::caller()),
        }),
    };

    if let Err(e) = result {
        error!("Key capture failed: {:?}", e);
        std::process::exit(1);
    }
}

/// Wire the session stack to `capture`, start the runtime thread, then
/// hand the main thread to key capture.
fn start<K: KeyCapture>(mut capture: K, config: Config) -> AppResult<()> {
    let manager = SessionManager::new(WsConnector::new(config.connection.url.clone()))
        .with_request_timeout(config.connection.request_timeout());
    let supervisor = Arc::new(Supervisor::new(manager, config.reconnect.policy()));
    let registry = ActionRegistry::builtin(
        Arc::clone(&supervisor),
        config.actions.toggle_style,
        &config.labels,
    );

    let plan = plan_bindings(&config.bindings, &registry, |descriptor| {
        capture.resolve(descriptor)
    });

    info!(
        backend = capture.name(),
        url = %config.connection.url,
        "OBS Hotkey Script Started"
    );

    let mut bound = 0;
    for binding in &plan.active {
        match capture.register(binding) {
            Ok(()) => {
                bound += 1;
                info!(hotkey = %binding.descriptor, action = %binding.label, "Hotkey bound");
            }
            Err(e) => warn!(hotkey = %binding.descriptor, error = %e, "Hotkey not bound"),
        }
    }
    for warning in &plan.warnings {
        warn!("{}", warning);
    }
    if bound == 0 {
        warn!("No valid hotkeys configured, check the [bindings] section of the config file");
    }

    let (command_tx, command_rx) = mpsc::channel(32);
    let app = App {
        supervisor,
        hotkey_handler: HotkeyHandler::new(InputEventDispatcher::new(Arc::new(registry))),
        command_tx: command_tx.clone(),
        command_rx,
    };

    std::thread::Builder::new()
        .name("obs-hotkey-runtime".to_string())
        .spawn(move || {
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    error!("Failed to create tokio runtime: {:?}", e);
                    std::process::exit(1);
                }
            };

            let code = match rt.block_on(app.run()) {
                Ok(()) => 0,
                Err(e) => {
                    error!(error = ?e, "App error");
                    1
                }
            };

            // Key capture never returns on its own, so the runtime thread
            // ends the process.
            std::process::exit(code);
        })?;

    info!("Listening for hotkeys... (Press Ctrl+C to exit)");

    capture.run(command_tx)
}
