use serde::Deserialize;
use serde_json::{Map, Value};

/// Normalised response, independent of the wire shape it arrived in.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Response {
    /// Correlation identifier echoed by the endpoint.
    pub request_id: Option<String>,
    /// Request type echoed by the endpoint, when present.
    pub request_type: Option<String>,
    /// Whether the endpoint reports success.
    pub ok: bool,
    /// Numeric status code, when the shape carries one.
    pub code: Option<i64>,
    /// Result payload. Empty when the response carries none.
    pub data: Map<String, Value>,
    /// Error message when `ok` is false.
    pub error: Option<String>,
}

impl Response {
    /// Boolean field of the result payload.
    pub fn bool_field(&self, name: &str) -> Option<bool> {
        self.data.get(name).and_then(Value::as_bool)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequestStatus {
    result: bool,
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    comment: Option<String>,
}

/// `op: 7` payload, and batch result entries.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EnvelopedResponse {
    #[serde(default)]
    request_type: Option<String>,
    #[serde(default)]
    request_id: Option<String>,
    #[serde(default)]
    request_status: Option<RequestStatus>,
    #[serde(default)]
    response_data: Option<Map<String, Value>>,
    /// Older servers report failures as a bare string here.
    #[serde(default)]
    error: Option<String>,
}

/// Top-level response with a `status` string and no envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct FlatResponse {
    #[serde(rename = "message-id", default)]
    message_id: Option<String>,
    status: String,
    #[serde(default)]
    error: Option<String>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

/// The two response shapes seen in the wild.
#[derive(Debug)]
pub(crate) enum ResponseShape {
    Enveloped(EnvelopedResponse),
    Flat(FlatResponse),
}

impl ResponseShape {
    pub(crate) fn normalize(self) -> Response {
        match self {
            ResponseShape::Enveloped(raw) => {
                let status_ok = raw.request_status.as_ref().is_none_or(|s| s.result);
                let ok = status_ok && raw.error.is_none();
                let code = raw.request_status.as_ref().and_then(|s| s.code);
                let error = if ok {
                    None
                } else {
                    raw.error
                        .or_else(|| raw.request_status.and_then(|s| s.comment))
                        .or_else(|| Some(format!("request failed with code {:?}", code)))
                };

                Response {
                    request_id: raw.request_id,
                    request_type: raw.request_type,
                    ok,
                    code,
                    data: raw.response_data.unwrap_or_default(),
                    error,
                }
            }
            ResponseShape::Flat(raw) => {
                let ok = raw.status.eq_ignore_ascii_case("ok");
                let error = if ok {
                    None
                } else {
                    Some(
                        raw.error
                            .unwrap_or_else(|| format!("request failed with status {}", raw.status)),
                    )
                };

                Response {
                    request_id: raw.message_id,
                    request_type: None,
                    ok,
                    code: None,
                    data: raw.rest,
                    error,
                }
            }
        }
    }
}
