use error_location::ErrorLocation;
use thiserror::Error;

/// Control session errors with source location tracking.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The endpoint actively refused the connection.
    #[error("Connection refused by {url} {location}")]
    ConnectionRefused {
        /// Endpoint address that refused the connection.
        url: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Socket-level failure (reset, closed, timed out).
    #[error("Transport error: {reason} {location}")]
    Transport {
        /// Description of the transport failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Hello/Identify/Identified exchange malformed or out of sequence.
    #[error("Handshake failed: {reason} {location}")]
    Handshake {
        /// Description of the handshake failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A frame could not be decoded or did not correlate with the request.
    #[error("Protocol violation: {reason} {location}")]
    Protocol {
        /// Description of the violation.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A request was attempted without a ready session.
    #[error("Not connected to the control endpoint {location}")]
    NotConnected {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The endpoint reported that the request failed.
    #[error("{request_type} rejected by endpoint (code {code:?}): {comment} {location}")]
    Remote {
        /// Request type that failed.
        request_type: String,
        /// Status code reported by the endpoint, when present.
        code: Option<i64>,
        /// Error message reported by the endpoint.
        comment: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A status query failed or returned an unexpected shape.
    #[error("Status query failed: {reason} {location}")]
    QueryFailed {
        /// Description of the failure.
        reason: String,
        /// Underlying call failure, if the query never got a response.
        #[source]
        source: Option<Box<SessionError>>,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl SessionError {
    /// Whether this error means the session is gone and a reconnect may help.
    ///
    /// `Remote` and `QueryFailed` leave the session usable.
    pub fn is_connection_fault(&self) -> bool {
        matches!(
            self,
            SessionError::ConnectionRefused { .. }
                | SessionError::Transport { .. }
                | SessionError::Handshake { .. }
                | SessionError::Protocol { .. }
                | SessionError::NotConnected { .. }
        )
    }
}

/// Result type alias using [`SessionError`].
pub type Result<T> = std::result::Result<T, SessionError>;
