/// Recording state snapshot, fetched right before a toggle decision.
///
/// Never cached: the endpoint's state can change outside this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordState {
    /// A recording is in progress (paused or not).
    pub active: bool,
    /// The in-progress recording is paused.
    pub paused: bool,
}

/// Result of a toggle operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The named request was sent and acknowledged.
    Issued {
        /// Request type that was sent.
        request_type: &'static str,
    },
    /// Nothing was sent because the current state does not allow it.
    Ineligible {
        /// Why the toggle was skipped.
        reason: &'static str,
    },
}
