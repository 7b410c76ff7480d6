use std::fmt;

/// Lifecycle of the control session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No transport. Initial state and the target of every failure.
    Disconnected,
    /// Transport is being opened.
    Connecting,
    /// Transport open, waiting for the server greeting.
    AwaitingHello,
    /// Identify sent, waiting for the acknowledgement.
    AwaitingIdentified,
    /// Handshake complete; requests may be sent.
    Ready,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Disconnected => "disconnected",
            SessionState::Connecting => "connecting",
            SessionState::AwaitingHello => "awaiting-hello",
            SessionState::AwaitingIdentified => "awaiting-identified",
            SessionState::Ready => "ready",
        };
        f.write_str(name)
    }
}
