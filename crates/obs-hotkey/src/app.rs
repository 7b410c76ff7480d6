use crate::{AppCommand, AppResult, HotkeyHandler};

use std::{sync::Arc, time::Duration};

use obs_hotkey_core::{Connector, Supervisor};
use tokio::sync::{mpsc, watch};
use tracing::{error, info, instrument, warn};

/// Main application state.
///
/// Runs on the async runtime thread. Key capture owns the main thread and
/// feeds triggers in through `command_rx`.
pub struct App<C: Connector> {
    pub(crate) supervisor: Arc<Supervisor<C>>,
    pub(crate) hotkey_handler: HotkeyHandler,
    pub(crate) command_tx: mpsc::Sender<AppCommand>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
}

impl<C: Connector> App<C> {
    /// Run the main application event loop until shutdown.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("OBS Hotkey starting");

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let supervisor = Arc::clone(&self.supervisor);
        let supervisor_handle = tokio::spawn(async move { supervisor.run(shutdown_rx).await });

        let signal_tx = self.command_tx.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    if let Err(e) = signal_tx.send(AppCommand::Shutdown).await {
                        error!(error = ?e, "Failed to send shutdown command");
                    }
                }
                Err(e) => error!(error = %e, "Failed to listen for Ctrl+C"),
            }
        });

        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    match cmd {
                        AppCommand::Trigger { action_id } => {
                            self.hotkey_handler.handle_trigger(action_id);
                        }
                        AppCommand::Shutdown => {
                            info!("Shutdown requested");
                            break;
                        }
                    }
                }

                else => {
                    info!("All channels closed, shutting down");
                    break;
                }
            }
        }

        let _ = shutdown_tx.send(true);

        match tokio::time::timeout(Duration::from_secs(1), supervisor_handle).await {
            Ok(Ok(())) => info!("Reconnect supervisor stopped cleanly"),
            Ok(Err(e)) => error!(error = ?e, "Reconnect supervisor task panicked"),
            Err(_) => warn!("Reconnect supervisor did not stop within timeout"),
        }

        self.supervisor.shutdown().await;
        info!("OBS Hotkey shut down successfully");

        Ok(())
    }
}
