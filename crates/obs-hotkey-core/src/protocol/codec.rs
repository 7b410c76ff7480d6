//! Envelope encoding and decoding.
//!
//! Every frame is a JSON text record `{"op": <code>, "d": {...}}`. Decoding
//! also accepts the flat, envelope-less response shape used by older
//! endpoints and folds both into a single [`Response`].

use crate::{
    CoreResult, SessionError,
    protocol::{
        ClientMessage, Hello, Identified, OpCode, Response, ServerMessage,
        response::{EnvelopedResponse, FlatResponse, ResponseShape},
    },
};

use std::panic::Location;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

/// Raw protocol frame: operation code plus its payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Operation code.
    pub op: OpCode,
    /// Payload whose shape depends on `op`.
    #[serde(default)]
    pub d: Value,
}

/// Encode an operation code and payload into a text frame.
#[track_caller]
pub fn encode(op: OpCode, payload: Value) -> CoreResult<String> {
    serde_json::to_string(&Envelope { op, d: payload }).map_err(|e| SessionError::Protocol {
        reason: format!("Failed to encode {:?} frame: {}", op, e),
        location: ErrorLocation::from(Location::caller()),
    })
}

/// Decode an enveloped text frame into its operation code and payload.
#[track_caller]
pub fn decode(frame: &str) -> CoreResult<Envelope> {
    serde_json::from_str(frame).map_err(|e| SessionError::Protocol {
        reason: format!("Malformed frame: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })
}

/// Encode a typed client message.
#[track_caller]
pub fn encode_message(message: &ClientMessage) -> CoreResult<String> {
    let payload = match message {
        ClientMessage::Identify(identify) => serde_json::to_value(identify),
        ClientMessage::Request(request) => serde_json::to_value(request),
        ClientMessage::RequestBatch(batch) => serde_json::to_value(batch),
    }
    .map_err(|e| SessionError::Protocol {
        reason: format!("Failed to serialize {:?} payload: {}", message.op_code(), e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    encode(message.op_code(), payload)
}

/// Decode a server frame, normalising whichever response shape it uses.
#[track_caller]
pub fn decode_message(frame: &str) -> CoreResult<ServerMessage> {
    let value: Value = serde_json::from_str(frame).map_err(|e| SessionError::Protocol {
        reason: format!("Frame is not valid JSON: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let is_enveloped = value.get("op").is_some();
    let is_flat = value.get("status").is_some_and(Value::is_string);

    if is_enveloped {
        let envelope: Envelope = parse(value, "envelope")?;
        decode_envelope(envelope)
    } else if is_flat {
        let flat: FlatResponse = parse(value, "flat response")?;
        Ok(ServerMessage::Response(ResponseShape::Flat(flat).normalize()))
    } else {
        Err(SessionError::Protocol {
            reason: "Frame has neither an operation code nor a status field".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

#[track_caller]
fn decode_envelope(envelope: Envelope) -> CoreResult<ServerMessage> {
    match envelope.op {
        OpCode::Hello => Ok(ServerMessage::Hello(parse::<Hello>(envelope.d, "Hello")?)),
        OpCode::Identified => Ok(ServerMessage::Identified(parse::<Identified>(
            envelope.d,
            "Identified",
        )?)),
        OpCode::Event => {
            let event_type = envelope
                .d
                .get("eventType")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string();
            Ok(ServerMessage::Event { event_type })
        }
        OpCode::RequestResponse => {
            let raw: EnvelopedResponse = parse(envelope.d, "RequestResponse")?;
            Ok(ServerMessage::Response(
                ResponseShape::Enveloped(raw).normalize(),
            ))
        }
        OpCode::RequestBatchResponse => {
            let request_id = envelope
                .d
                .get("requestId")
                .and_then(Value::as_str)
                .map(str::to_string);
            let results = match envelope.d.get("results") {
                Some(results) => parse::<Vec<EnvelopedResponse>>(results.clone(), "batch results")?,
                None => Vec::new(),
            };
            Ok(ServerMessage::BatchResponse {
                request_id,
                results: results
                    .into_iter()
                    .map(|raw| ResponseShape::Enveloped(raw).normalize())
                    .collect::<Vec<Response>>(),
            })
        }
        op => Err(SessionError::Protocol {
            reason: format!("Server sent client-only operation {:?}", op),
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}

#[track_caller]
fn parse<T: DeserializeOwned>(value: Value, what: &str) -> CoreResult<T> {
    serde_json::from_value(value).map_err(|e| SessionError::Protocol {
        reason: format!("Malformed {} payload: {}", what, e),
        location: ErrorLocation::from(Location::caller()),
    })
}
