mod websocket;

pub use websocket::{WsConnector, WsTransport};

use crate::CoreResult;

use std::future::Future;

/// A connected, message-oriented text channel to the control endpoint.
///
/// Exclusively owned by the session that opened it.
pub trait Transport: Send {
    /// Send one text frame.
    fn send(&mut self, frame: String) -> impl Future<Output = CoreResult<()>> + Send;

    /// Receive the next text frame. `Ok(None)` means the peer closed.
    fn recv(&mut self) -> impl Future<Output = CoreResult<Option<String>>> + Send;

    /// Close the channel. Errors are ignored.
    fn close(&mut self) -> impl Future<Output = ()> + Send;
}

/// Opens new transports to a fixed endpoint.
pub trait Connector: Send + Sync + 'static {
    /// Transport produced by this connector.
    type Transport: Transport + 'static;

    /// Endpoint address, for logs and errors.
    fn endpoint(&self) -> &str;

    /// Open a fresh transport.
    fn connect(&self) -> impl Future<Output = CoreResult<Self::Transport>> + Send;
}
