use crate::{
    CoreResult, SessionError,
    transport::{Connector, Transport},
};

use std::{io::ErrorKind, panic::Location};

use error_location::ErrorLocation;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{self, Message},
};
use tracing::{debug, instrument, trace};

/// Opens plain WebSocket connections to the control endpoint.
#[derive(Debug, Clone)]
pub struct WsConnector {
    url: String,
}

impl WsConnector {
    /// Connector for `url`, e.g. `ws://localhost:4455`.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Connector for WsConnector {
    type Transport = WsTransport;

    fn endpoint(&self) -> &str {
        &self.url
    }

    #[instrument(skip(self), fields(url = %self.url))]
    async fn connect(&self) -> CoreResult<WsTransport> {
        let (stream, response) = connect_async(self.url.as_str()).await.map_err(|e| match e {
            tungstenite::Error::Io(ref io) if io.kind() == ErrorKind::ConnectionRefused => {
                SessionError::ConnectionRefused {
                    url: self.url.clone(),
                    location: ErrorLocation::from(Location::caller()),
                }
            }
            other => SessionError::Transport {
                reason: format!("Failed to open {}: {}", self.url, other),
                location: ErrorLocation::from(Location::caller()),
            },
        })?;

        debug!(status = %response.status(), "WebSocket upgrade complete");

        Ok(WsTransport { stream })
    }
}

/// WebSocket text channel.
pub struct WsTransport {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl Transport for WsTransport {
    async fn send(&mut self, frame: String) -> CoreResult<()> {
        trace!(frame = %frame, "Sending frame");
        self.stream
            .send(Message::Text(frame))
            .await
            .map_err(|e| SessionError::Transport {
                reason: format!("Failed to send frame: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    async fn recv(&mut self) -> CoreResult<Option<String>> {
        loop {
            let message = match self.stream.next().await {
                Some(Ok(message)) => message,
                Some(Err(tungstenite::Error::ConnectionClosed)) | None => return Ok(None),
                Some(Err(e)) => {
                    return Err(SessionError::Transport {
                        reason: format!("Failed to receive frame: {}", e),
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
            };

            match message {
                Message::Text(text) => {
                    trace!(frame = %text, "Received frame");
                    return Ok(Some(text));
                }
                Message::Binary(bytes) => {
                    return String::from_utf8(bytes).map(Some).map_err(|e| {
                        SessionError::Protocol {
                            reason: format!("Binary frame is not UTF-8: {}", e),
                            location: ErrorLocation::from(Location::caller()),
                        }
                    });
                }
                Message::Close(frame) => {
                    debug!(close_frame = ?frame, "Endpoint closed the connection");
                    return Ok(None);
                }
                // Pings are answered by tungstenite on the next read or write.
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
            }
        }
    }

    async fn close(&mut self) {
        if let Err(e) = self.stream.close(None).await {
            debug!(error = %e, "Error while closing WebSocket");
        }
    }
}
