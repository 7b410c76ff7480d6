mod codec;
mod message;
mod op_code;
pub mod request_type;
mod response;

pub use {
    codec::{Envelope, decode, decode_message, encode, encode_message},
    message::{
        ClientMessage, Hello, Identified, Identify, RPC_VERSION, Request, RequestBatch,
        ServerMessage,
    },
    op_code::OpCode,
    response::Response,
};
