use serde::{Deserialize, Serialize};

/// Envelope operation codes of the control protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum OpCode {
    /// Server greeting, sent once right after the socket opens.
    Hello,
    /// Client identification, answered by [`OpCode::Identified`].
    Identify,
    /// Server acknowledgement of a successful identify.
    Identified,
    /// Client update of session parameters. Never sent by this crate.
    Reidentify,
    /// Unsolicited server event.
    Event,
    /// Single client request.
    Request,
    /// Server response to a single request.
    RequestResponse,
    /// Several client requests in one frame.
    RequestBatch,
    /// Server response to a request batch.
    RequestBatchResponse,
}

impl TryFrom<u8> for OpCode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OpCode::Hello),
            1 => Ok(OpCode::Identify),
            2 => Ok(OpCode::Identified),
            3 => Ok(OpCode::Reidentify),
            5 => Ok(OpCode::Event),
            6 => Ok(OpCode::Request),
            7 => Ok(OpCode::RequestResponse),
            8 => Ok(OpCode::RequestBatch),
            9 => Ok(OpCode::RequestBatchResponse),
            other => Err(format!("unknown operation code {}", other)),
        }
    }
}

impl From<OpCode> for u8 {
    fn from(op: OpCode) -> Self {
        match op {
            OpCode::Hello => 0,
            OpCode::Identify => 1,
            OpCode::Identified => 2,
            OpCode::Reidentify => 3,
            OpCode::Event => 5,
            OpCode::Request => 6,
            OpCode::RequestResponse => 7,
            OpCode::RequestBatch => 8,
            OpCode::RequestBatchResponse => 9,
        }
    }
}
