use std::{
    panic::Location,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use error_location::ErrorLocation;
use obs_hotkey_core::{
    Connector, CoreResult, SessionError, Transport,
    actions::{Action, ActionOutcome, ActionRegistry},
};

/// Registry with one action that counts its invocations.
pub(crate) fn counting_registry(action_id: &str) -> (Arc<AtomicUsize>, ActionRegistry) {
    let count = Arc::new(AtomicUsize::new(0));
    let mut registry = ActionRegistry::new();
    let counter = Arc::clone(&count);
    registry.register(Action::new(action_id, "Counted", move || {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(ActionOutcome::Skipped { reason: "counted" })
        }
    }));
    (count, registry)
}

/// Connector for an endpoint that is never running.
pub(crate) struct RefusingConnector;

pub(crate) struct NeverTransport;

impl Transport for NeverTransport {
    async fn send(&mut self, _frame: String) -> CoreResult<()> {
        Ok(())
    }

    async fn recv(&mut self) -> CoreResult<Option<String>> {
        Ok(None)
    }

    async fn close(&mut self) {}
}

impl Connector for RefusingConnector {
    type Transport = NeverTransport;

    fn endpoint(&self) -> &str {
        "ws://refusing:4455"
    }

    async fn connect(&self) -> CoreResult<NeverTransport> {
        Err(SessionError::ConnectionRefused {
            url: self.endpoint().to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
