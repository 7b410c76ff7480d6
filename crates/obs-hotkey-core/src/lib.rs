//! obs-hotkey core library
//!
//! Session and request lifecycle for driving OBS Studio over its WebSocket
//! control protocol from key presses.
//!
//! # Example
//!
//! ```no_run
//! use obs_hotkey_core::{
//!     CoreResult, ReconnectPolicy, SessionManager, Supervisor, WsConnector,
//!     protocol::request_type::TOGGLE_RECORD,
//! };
//!
//! #[tokio::main]
//! async fn main() -> CoreResult<()> {
//!     let manager = SessionManager::new(WsConnector::new("ws://localhost:4455"));
//!     let supervisor = Supervisor::new(manager, ReconnectPolicy::default());
//!
//!     supervisor.connect_with_retries().await;
//!     supervisor.call(TOGGLE_RECORD, None).await?;
//!     Ok(())
//! }
//! ```

pub mod actions;
mod dispatcher;
mod error;
pub mod protocol;
mod session;
mod supervisor;
mod transport;

pub use {
    dispatcher::InputEventDispatcher,
    error::{Result as CoreResult, SessionError},
    session::{
        DEFAULT_REQUEST_TIMEOUT, NegotiatedVersion, RecordState, SessionManager, SessionState,
        ToggleOutcome,
    },
    supervisor::{
        DEFAULT_DEGRADED_INTERVAL, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY, ReconnectPolicy,
        Supervisor,
    },
    transport::{Connector, Transport, WsConnector, WsTransport},
};

#[cfg(test)]
mod tests;
