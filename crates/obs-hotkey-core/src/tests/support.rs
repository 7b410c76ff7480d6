//! Scripted in-memory control endpoint.

use crate::{
    CoreResult, RecordState, SessionError,
    protocol::{OpCode, decode},
    transport::{Connector, Transport},
};

use std::{
    collections::{HashMap, VecDeque},
    panic::Location,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use error_location::ErrorLocation;
use serde_json::{Map, Value, json};
use tokio::time::Instant;

/// One frame crossing the fake wire, named by request type or op code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Wire {
    Sent(String),
    Received(String),
}

/// Endpoint behaviour and everything it observed.
#[derive(Debug, Default)]
pub(crate) struct Endpoint {
    pub(crate) refuse: bool,
    pub(crate) skip_identified: bool,
    pub(crate) require_auth: bool,
    pub(crate) record_status: Option<RecordState>,
    pub(crate) mismatch_ids: bool,
    pub(crate) silent: bool,
    pub(crate) close_on_request: bool,
    pub(crate) event_before_response: bool,
    pub(crate) event_stream: bool,
    pub(crate) flat_responses: bool,
    pub(crate) reject: HashMap<String, String>,
    pub(crate) connects: Vec<Instant>,
    pub(crate) wire: Vec<Wire>,
}

impl Endpoint {
    /// Request types the client sent, in order.
    pub(crate) fn requests(&self) -> Vec<String> {
        self.wire
            .iter()
            .filter_map(|w| match w {
                Wire::Sent(name) if name != "Identify" => Some(name.clone()),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeConnector {
    endpoint: Arc<Mutex<Endpoint>>,
}

impl FakeConnector {
    pub(crate) fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint: Arc::new(Mutex::new(endpoint)),
        }
    }

    pub(crate) fn script(&self) -> MutexGuard<'_, Endpoint> {
        self.endpoint.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Connector for FakeConnector {
    type Transport = FakeTransport;

    fn endpoint(&self) -> &str {
        "ws://fake:4455"
    }

    async fn connect(&self) -> CoreResult<FakeTransport> {
        let hello = {
            let mut endpoint = self.script();
            endpoint.connects.push(Instant::now());
            if endpoint.refuse {
                return Err(SessionError::ConnectionRefused {
                    url: "ws://fake:4455".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }

            let mut d = json!({"obsWebSocketVersion": "5.4.2", "rpcVersion": 1});
            if endpoint.require_auth {
                d["authentication"] = json!({"challenge": "c", "salt": "s"});
            }
            json!({"op": 0, "d": d}).to_string()
        };

        Ok(FakeTransport {
            endpoint: Arc::clone(&self.endpoint),
            inbox: VecDeque::from([hello]),
            closed: false,
        })
    }
}

pub(crate) struct FakeTransport {
    endpoint: Arc<Mutex<Endpoint>>,
    inbox: VecDeque<String>,
    closed: bool,
}

impl FakeTransport {
    fn respond(&mut self, frame: &Value) {
        let d = frame.get("d").cloned().unwrap_or(Value::Null);
        let request_type = d
            .get("requestType")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let request_id = d
            .get("requestId")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let mut replies = Vec::new();
        {
            let mut endpoint = self.endpoint.lock().unwrap_or_else(PoisonError::into_inner);
            endpoint.wire.push(Wire::Sent(request_type.clone()));
            if endpoint.close_on_request {
                self.closed = true;
                return;
            }
            if endpoint.silent {
                return;
            }
            if endpoint.event_before_response {
                replies.push(
                    json!({"op": 5, "d": {"eventType": "RecordStateChanged", "eventIntent": 64}})
                        .to_string(),
                );
            }

            let id = if endpoint.mismatch_ids {
                "someone-else".to_string()
            } else {
                request_id
            };
            let data = response_data(&endpoint, &request_type);
            let reply = match endpoint.reject.get(&request_type) {
                Some(comment) if endpoint.flat_responses => {
                    json!({"message-id": id, "status": "error", "error": comment})
                }
                Some(comment) => json!({"op": 7, "d": {
                    "requestType": request_type,
                    "requestId": id,
                    "requestStatus": {"result": false, "code": 604, "comment": comment},
                }}),
                None if endpoint.flat_responses => {
                    let mut flat = data;
                    flat.insert("message-id".to_string(), json!(id));
                    flat.insert("status".to_string(), json!("ok"));
                    Value::Object(flat)
                }
                None => json!({"op": 7, "d": {
                    "requestType": request_type,
                    "requestId": id,
                    "requestStatus": {"result": true, "code": 100},
                    "responseData": data,
                }}),
            };
            replies.push(reply.to_string());
        }
        self.inbox.extend(replies);
    }

    fn respond_batch(&mut self, frame: &Value) {
        let d = frame.get("d").cloned().unwrap_or(Value::Null);
        let requests = d
            .get("requests")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let results: Vec<Value> = {
            let mut endpoint = self.endpoint.lock().unwrap_or_else(PoisonError::into_inner);
            endpoint.wire.push(Wire::Sent("Batch".to_string()));
            requests
                .iter()
                .map(|request| {
                    let request_type = request
                        .get("requestType")
                        .and_then(Value::as_str)
                        .unwrap_or_default();
                    let ok = !endpoint.reject.contains_key(request_type);
                    json!({
                        "requestType": request_type,
                        "requestId": request.get("requestId"),
                        "requestStatus": {"result": ok, "code": if ok { 100 } else { 604 }},
                    })
                })
                .collect()
        };

        self.inbox.push_back(
            json!({"op": 9, "d": {"requestId": d.get("requestId"), "results": results}})
                .to_string(),
        );
    }
}

fn response_data(endpoint: &Endpoint, request_type: &str) -> Map<String, Value> {
    match (request_type, endpoint.record_status) {
        ("GetRecordStatus", Some(state)) => {
            let mut data = Map::new();
            data.insert("outputActive".to_string(), json!(state.active));
            data.insert("outputPaused".to_string(), json!(state.paused));
            data.insert("outputTimecode".to_string(), json!("00:00:00.000"));
            data
        }
        _ => Map::new(),
    }
}

fn frame_name(frame: &str) -> String {
    let value: Value = serde_json::from_str(frame).unwrap_or(Value::Null);
    if let Some(request_type) = value.pointer("/d/requestType").and_then(Value::as_str) {
        return request_type.to_string();
    }
    match value.get("op").and_then(Value::as_u64) {
        Some(0) => "Hello".to_string(),
        Some(2) => "Identified".to_string(),
        Some(5) => "Event".to_string(),
        Some(9) => "Batch".to_string(),
        _ => "Other".to_string(),
    }
}

impl Transport for FakeTransport {
    async fn send(&mut self, frame: String) -> CoreResult<()> {
        tokio::task::yield_now().await;

        let envelope = decode(&frame)?;
        let value: Value = serde_json::from_str(&frame).unwrap_or(Value::Null);
        match envelope.op {
            OpCode::Identify => {
                let skip = {
                    let mut endpoint = self.endpoint.lock().unwrap_or_else(PoisonError::into_inner);
                    endpoint.wire.push(Wire::Sent("Identify".to_string()));
                    endpoint.skip_identified
                };
                let reply = if skip {
                    json!({"op": 5, "d": {"eventType": "ExitStarted", "eventIntent": 1}})
                } else {
                    json!({"op": 2, "d": {"negotiatedRpcVersion": 1}})
                };
                self.inbox.push_back(reply.to_string());
            }
            OpCode::Request => self.respond(&value),
            OpCode::RequestBatch => self.respond_batch(&value),
            _ => {}
        }
        Ok(())
    }

    async fn recv(&mut self) -> CoreResult<Option<String>> {
        tokio::task::yield_now().await;

        if let Some(frame) = self.inbox.pop_front() {
            self.endpoint
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .wire
                .push(Wire::Received(frame_name(&frame)));
            return Ok(Some(frame));
        }
        if self.closed {
            return Ok(None);
        }
        if self.endpoint.lock().unwrap_or_else(PoisonError::into_inner).event_stream {
            tokio::time::sleep(Duration::from_secs(1)).await;
            return Ok(Some(
                json!({"op": 5, "d": {"eventType": "InputVolumeMeters", "eventIntent": 65536}})
                    .to_string(),
            ));
        }
        std::future::pending().await
    }

    async fn close(&mut self) {
        self.closed = true;
    }
}
