mod manager;
mod record_state;
mod state;

pub use {
    manager::{DEFAULT_REQUEST_TIMEOUT, NegotiatedVersion, SessionManager},
    record_state::{RecordState, ToggleOutcome},
    state::SessionState,
};
