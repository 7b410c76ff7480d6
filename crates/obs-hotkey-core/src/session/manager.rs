//! Control session lifecycle and request/response correlation.
//!
//! The manager owns at most one transport. Traffic is strictly synchronous:
//! a request is sent and its response received before anything else touches
//! the wire. Callers that share the manager across tasks must hold a lock for
//! the full duration of each operation.

use crate::{
    CoreResult, SessionError,
    protocol::{
        ClientMessage, Hello, Identify, Request, RequestBatch, Response, ServerMessage,
        decode_message, encode_message,
        request_type::{
            GET_RECORD_STATUS, PAUSE_RECORDING, RESUME_RECORDING, START_RECORDING,
            STOP_RECORDING,
        },
    },
    session::{RecordState, SessionState, ToggleOutcome},
    transport::{Connector, Transport},
};

use std::{panic::Location, time::Duration};

use error_location::ErrorLocation;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Default bound on how long a single receive may wait.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Versions agreed during the handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegotiatedVersion {
    /// Endpoint's WebSocket server version string, when reported.
    pub server_version: Option<String>,
    /// RPC version in effect for this session.
    pub rpc_version: u32,
}

struct Session<T> {
    id: Uuid,
    transport: T,
    version: NegotiatedVersion,
    request_counter: u64,
}

impl<T> Session<T> {
    fn next_request_id(&mut self, request_type: &str) -> String {
        self.request_counter += 1;
        format!("{}-{}", request_type, self.request_counter)
    }
}

/// Owns the single logical connection to the control endpoint.
pub struct SessionManager<C: Connector> {
    connector: C,
    state: SessionState,
    session: Option<Session<C::Transport>>,
    request_timeout: Duration,
}

impl<C: Connector> SessionManager<C> {
    /// Create a disconnected manager.
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            state: SessionState::Disconnected,
            session: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Override how long one request or handshake step may wait for its reply.
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether requests may be sent.
    pub fn is_ready(&self) -> bool {
        self.state == SessionState::Ready
    }

    /// Endpoint this manager connects to.
    pub fn endpoint(&self) -> &str {
        self.connector.endpoint()
    }

    /// Versions negotiated by the current session.
    pub fn negotiated_version(&self) -> Option<&NegotiatedVersion> {
        self.session.as_ref().map(|s| &s.version)
    }

    /// Open a transport and run the Hello/Identify/Identified handshake.
    ///
    /// Any existing session is closed first. On failure the manager is left
    /// `Disconnected`.
    #[instrument(skip(self), fields(url = %self.connector.endpoint()))]
    pub async fn connect(&mut self) -> CoreResult<()> {
        self.disconnect().await;

        self.state = SessionState::Connecting;
        let mut transport = match self.connector.connect().await {
            Ok(transport) => transport,
            Err(e) => {
                self.state = SessionState::Disconnected;
                return Err(e);
            }
        };

        match self.handshake(&mut transport).await {
            Ok(version) => {
                let id = Uuid::new_v4();
                info!(
                    session_id = %id,
                    server_version = version.server_version.as_deref().unwrap_or("unknown"),
                    rpc_version = version.rpc_version,
                    "Identified to control endpoint"
                );
                self.session = Some(Session {
                    id,
                    transport,
                    version,
                    request_counter: 0,
                });
                self.state = SessionState::Ready;
                Ok(())
            }
            Err(e) => {
                transport.close().await;
                self.state = SessionState::Disconnected;
                Err(e)
            }
        }
    }

    async fn handshake(&mut self, transport: &mut C::Transport) -> CoreResult<NegotiatedVersion> {
        self.state = SessionState::AwaitingHello;
        let hello = match handshake_frame(transport, self.request_timeout).await? {
            ServerMessage::Hello(hello) => hello,
            other => {
                return Err(SessionError::Handshake {
                    reason: format!("Expected Hello, got {:?}", other),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };
        reject_authentication(&hello)?;

        let identify = Identify::for_hello(&hello);
        let rpc_version = identify.rpc_version;
        debug!(rpc_version, "Sending Identify");
        transport
            .send(encode_message(&ClientMessage::Identify(identify))?)
            .await?;

        self.state = SessionState::AwaitingIdentified;
        let identified = match handshake_frame(transport, self.request_timeout).await? {
            ServerMessage::Identified(identified) => identified,
            other => {
                return Err(SessionError::Handshake {
                    reason: format!("Expected Identified, got {:?}", other),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        Ok(NegotiatedVersion {
            server_version: hello.obs_web_socket_version,
            rpc_version: identified.negotiated_rpc_version.unwrap_or(rpc_version),
        })
    }

    /// Send one request and wait for its response.
    ///
    /// A transport failure or protocol violation drops the session. A failure
    /// reported by the endpoint is returned as [`SessionError::Remote`] and
    /// leaves the session ready.
    #[instrument(skip(self, params))]
    pub async fn call(&mut self, request_type: &str, params: Option<Value>) -> CoreResult<Response> {
        let request_timeout = self.request_timeout;
        let session = self.ready_session()?;
        let request_id = session.next_request_id(request_type);
        let frame = encode_message(&ClientMessage::Request(Request {
            request_type: request_type.to_string(),
            request_id: request_id.clone(),
            request_data: params,
        }))?;

        let result = exchange(&mut session.transport, frame, request_timeout)
            .await
            .and_then(|message| match message {
                ServerMessage::Response(response) => {
                    check_correlation(response.request_id.as_deref(), &request_id)?;
                    Ok(response)
                }
                other => Err(SessionError::Protocol {
                    reason: format!("Expected RequestResponse, got {:?}", other),
                    location: ErrorLocation::from(Location::caller()),
                }),
            });

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                self.drop_session(&e).await;
                return Err(e);
            }
        };

        if !response.ok {
            let comment = response.error.clone().unwrap_or_default();
            warn!(request_type, code = ?response.code, comment = %comment, "Request rejected");
            return Err(SessionError::Remote {
                request_type: request_type.to_string(),
                code: response.code,
                comment,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        debug!(request_id = %request_id, "Request acknowledged");
        Ok(response)
    }

    /// Send several requests in one batch frame.
    ///
    /// Per-request failures are reported through each [`Response::ok`];
    /// only connection and correlation problems fail the whole call.
    #[instrument(skip(self, requests))]
    pub async fn call_batch(
        &mut self,
        requests: Vec<(String, Option<Value>)>,
        halt_on_failure: bool,
    ) -> CoreResult<Vec<Response>> {
        let request_timeout = self.request_timeout;
        let session = self.ready_session()?;
        let batch_id = session.next_request_id("Batch");
        let requests = requests
            .into_iter()
            .map(|(request_type, request_data)| Request {
                request_id: session.next_request_id(&request_type),
                request_type,
                request_data,
            })
            .collect();
        let frame = encode_message(&ClientMessage::RequestBatch(RequestBatch {
            request_id: batch_id.clone(),
            halt_on_failure,
            requests,
        }))?;

        let result = exchange(&mut session.transport, frame, request_timeout)
            .await
            .and_then(|message| match message {
                ServerMessage::BatchResponse {
                    request_id,
                    results,
                } => {
                    check_correlation(request_id.as_deref(), &batch_id)?;
                    Ok(results)
                }
                other => Err(SessionError::Protocol {
                    reason: format!("Expected RequestBatchResponse, got {:?}", other),
                    location: ErrorLocation::from(Location::caller()),
                }),
            });

        match result {
            Ok(results) => Ok(results),
            Err(e) => {
                self.drop_session(&e).await;
                Err(e)
            }
        }
    }

    /// Fetch the current recording state.
    #[instrument(skip(self))]
    pub async fn record_status(&mut self) -> CoreResult<RecordState> {
        let response = self.call(GET_RECORD_STATUS, None).await.map_err(|e| {
            SessionError::QueryFailed {
                reason: format!("{} did not complete", GET_RECORD_STATUS),
                source: Some(Box::new(e)),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        match (
            response.bool_field("outputActive"),
            response.bool_field("outputPaused"),
        ) {
            (Some(active), Some(paused)) => Ok(RecordState { active, paused }),
            _ => Err(SessionError::QueryFailed {
                reason: format!(
                    "{} response lacks outputActive/outputPaused",
                    GET_RECORD_STATUS
                ),
                source: None,
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    /// Start recording if idle, stop it otherwise.
    ///
    /// The status read and the follow-up request are two separate round
    /// trips, so a state change made elsewhere in between is not detected.
    /// Prefer the endpoint's `ToggleRecord` where available.
    #[instrument(skip(self))]
    pub async fn toggle_recording(&mut self) -> CoreResult<ToggleOutcome> {
        let state = self.record_status().await?;
        let request_type = if state.active {
            STOP_RECORDING
        } else {
            START_RECORDING
        };

        self.call(request_type, None).await?;
        Ok(ToggleOutcome::Issued { request_type })
    }

    /// Pause or resume the active recording. Has the same race as
    /// [`toggle_recording`](Self::toggle_recording).
    #[instrument(skip(self))]
    pub async fn toggle_pause(&mut self) -> CoreResult<ToggleOutcome> {
        let state = self.record_status().await?;
        if !state.active {
            info!("Recording is not active, pause toggle skipped");
            return Ok(ToggleOutcome::Ineligible {
                reason: "recording is not active",
            });
        }

        let request_type = if state.paused {
            RESUME_RECORDING
        } else {
            PAUSE_RECORDING
        };

        self.call(request_type, None).await?;
        Ok(ToggleOutcome::Issued { request_type })
    }

    /// Close the session, if any.
    #[instrument(skip(self))]
    pub async fn disconnect(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.transport.close().await;
            info!(session_id = %session.id, "Session closed");
        }
        self.state = SessionState::Disconnected;
    }

    #[track_caller]
    fn ready_session(&mut self) -> CoreResult<&mut Session<C::Transport>> {
        match (self.state, self.session.as_mut()) {
            (SessionState::Ready, Some(session)) => Ok(session),
            _ => Err(SessionError::NotConnected {
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    async fn drop_session(&mut self, cause: &SessionError) {
        if !cause.is_connection_fault() {
            return;
        }
        if let Some(mut session) = self.session.take() {
            warn!(session_id = %session.id, error = %cause, "Dropping session");
            session.transport.close().await;
        }
        self.state = SessionState::Disconnected;
    }
}

#[track_caller]
fn reject_authentication(hello: &Hello) -> CoreResult<()> {
    if hello.authentication.is_some() {
        return Err(SessionError::Handshake {
            reason: "Endpoint requires password authentication, which is not supported"
                .to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    }
    Ok(())
}

async fn recv_frame<T: Transport>(transport: &mut T, timeout: Duration) -> CoreResult<String> {
    match tokio::time::timeout(timeout, next_frame(transport)).await {
        Ok(result) => result,
        Err(_) => Err(timed_out(timeout)),
    }
}

async fn next_frame<T: Transport>(transport: &mut T) -> CoreResult<String> {
    match transport.recv().await? {
        Some(frame) => Ok(frame),
        None => Err(SessionError::Transport {
            reason: "Connection closed by endpoint".to_string(),
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}

#[track_caller]
fn timed_out(timeout: Duration) -> SessionError {
    SessionError::Transport {
        reason: format!("No response received within {:?}", timeout),
        location: ErrorLocation::from(Location::caller()),
    }
}

/// Receive one handshake frame. Undecodable frames are handshake failures.
async fn handshake_frame<T: Transport>(
    transport: &mut T,
    timeout: Duration,
) -> CoreResult<ServerMessage> {
    let frame = recv_frame(transport, timeout).await?;
    decode_message(&frame).map_err(|e| SessionError::Handshake {
        reason: format!("Malformed handshake frame: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })
}

/// Send `frame` and wait for the next non-event frame. `timeout` bounds the
/// whole wait, however many events arrive in between.
async fn exchange<T: Transport>(
    transport: &mut T,
    frame: String,
    timeout: Duration,
) -> CoreResult<ServerMessage> {
    transport.send(frame).await?;

    match tokio::time::timeout(timeout, next_response(transport)).await {
        Ok(result) => result,
        Err(_) => Err(timed_out(timeout)),
    }
}

async fn next_response<T: Transport>(transport: &mut T) -> CoreResult<ServerMessage> {
    loop {
        let frame = next_frame(transport).await?;
        match decode_message(&frame)? {
            ServerMessage::Event { event_type } => {
                debug!(event_type = %event_type, "Skipping event while awaiting response");
            }
            message => return Ok(message),
        }
    }
}

/// A missing identifier is accepted (older shapes may omit it); a different
/// one is not.
#[track_caller]
fn check_correlation(received: Option<&str>, expected: &str) -> CoreResult<()> {
    match received {
        Some(id) if id != expected => Err(SessionError::Protocol {
            reason: format!("Response id {} does not match request id {}", id, expected),
            location: ErrorLocation::from(Location::caller()),
        }),
        Some(_) => Ok(()),
        None => {
            debug!(expected, "Response carries no request id");
            Ok(())
        }
    }
}
