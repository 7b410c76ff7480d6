use crate::{CoreResult, session::ToggleOutcome};

use std::{fmt, future::Future, sync::Arc};

use futures_util::future::BoxFuture;

/// What an action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// A request was sent and acknowledged.
    Sent {
        /// Request type that was sent.
        request_type: &'static str,
    },
    /// Nothing was sent.
    Skipped {
        /// Why the action was skipped.
        reason: &'static str,
    },
}

impl From<ToggleOutcome> for ActionOutcome {
    fn from(outcome: ToggleOutcome) -> Self {
        match outcome {
            ToggleOutcome::Issued { request_type } => ActionOutcome::Sent { request_type },
            ToggleOutcome::Ineligible { reason } => ActionOutcome::Skipped { reason },
        }
    }
}

type Operation = Arc<dyn Fn() -> BoxFuture<'static, CoreResult<ActionOutcome>> + Send + Sync>;

/// A named, zero-argument operation.
#[derive(Clone)]
pub struct Action {
    id: String,
    label: String,
    operation: Operation,
}

impl Action {
    /// Create an action from an async operation factory.
    pub fn new<F, Fut>(id: impl Into<String>, label: impl Into<String>, operation: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CoreResult<ActionOutcome>> + Send + 'static,
    {
        Self {
            id: id.into(),
            label: label.into(),
            operation: Arc::new(move || Box::pin(operation())),
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Run the operation.
    pub async fn invoke(&self) -> CoreResult<ActionOutcome> {
        (self.operation)().await
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
