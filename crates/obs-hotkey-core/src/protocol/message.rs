use crate::protocol::{OpCode, Response};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Highest RPC version this client speaks.
pub const RPC_VERSION: u32 = 1;

/// Server greeting payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hello {
    /// Version string of the endpoint's WebSocket server, when reported.
    #[serde(default)]
    pub obs_web_socket_version: Option<String>,
    /// Latest RPC version the endpoint supports.
    pub rpc_version: u32,
    /// Present when the endpoint requires password authentication.
    #[serde(default)]
    pub authentication: Option<Value>,
}

/// Server acknowledgement of identify.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identified {
    /// RPC version both sides agreed on.
    #[serde(default)]
    pub negotiated_rpc_version: Option<u32>,
}

/// Client identification payload. Authentication is never sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identify {
    /// Requested RPC version.
    pub rpc_version: u32,
    /// Event subscription bitmask. Zero opts out of unsolicited events.
    pub event_subscriptions: u32,
}

impl Identify {
    /// Identify for the highest version both sides support, with no events.
    pub fn for_hello(hello: &Hello) -> Self {
        Self {
            rpc_version: hello.rpc_version.min(RPC_VERSION),
            event_subscriptions: 0,
        }
    }
}

/// A single outbound operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// Operation name from the endpoint's request vocabulary.
    pub request_type: String,
    /// Identifier echoed back in the matching response.
    pub request_id: String,
    /// Optional structured parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_data: Option<Value>,
}

/// Several requests executed by the endpoint in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBatch {
    /// Identifier echoed back in the batch response.
    pub request_id: String,
    /// Stop at the first failed request.
    pub halt_on_failure: bool,
    /// Requests in execution order.
    pub requests: Vec<Request>,
}

/// Frames this client sends.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    /// Handshake identification.
    Identify(Identify),
    /// Single request.
    Request(Request),
    /// Request batch.
    RequestBatch(RequestBatch),
}

impl ClientMessage {
    /// Envelope operation code for this message.
    pub fn op_code(&self) -> OpCode {
        match self {
            ClientMessage::Identify(_) => OpCode::Identify,
            ClientMessage::Request(_) => OpCode::Request,
            ClientMessage::RequestBatch(_) => OpCode::RequestBatch,
        }
    }
}

/// Frames this client receives, after shape normalisation.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    /// Server greeting.
    Hello(Hello),
    /// Identify acknowledged.
    Identified(Identified),
    /// Unsolicited event.
    Event {
        /// Event name.
        event_type: String,
    },
    /// Response to a single request.
    Response(Response),
    /// Response to a request batch.
    BatchResponse {
        /// Identifier of the batch.
        request_id: Option<String>,
        /// Per-request results in execution order.
        results: Vec<Response>,
    },
}
