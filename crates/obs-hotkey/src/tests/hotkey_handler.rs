use crate::{
    HotkeyHandler,
    tests::support::counting_registry,
};

use std::sync::{Arc, atomic::Ordering};

use obs_hotkey_core::InputEventDispatcher;

/// WHAT: Each trigger runs the bound action once
/// WHY: Repeated presses are neither merged nor dropped
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_bound_action_when_triggered_twice_then_invoked_twice() {
    // Given: A handler over one counting action
    let (count, registry) = counting_registry("toggle_recording");
    let handler = HotkeyHandler::new(InputEventDispatcher::new(Arc::new(registry)));

    // When: Triggering twice
    handler
        .handle_trigger("toggle_recording".to_string())
        .await
        .unwrap();
    handler
        .handle_trigger("toggle_recording".to_string())
        .await
        .unwrap();

    // Then: Two invocations
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

/// WHAT: Triggers for unregistered actions complete without running anything
/// WHY: A stale binding must not take down the command loop
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_unregistered_action_when_triggered_then_task_completes() {
    // Given: A handler over one counting action
    let (count, registry) = counting_registry("toggle_recording");
    let handler = HotkeyHandler::new(InputEventDispatcher::new(Arc::new(registry)));

    // When: Triggering another id
    handler
        .handle_trigger("toggle_scene".to_string())
        .await
        .unwrap();

    // Then: Nothing ran
    assert_eq!(count.load(Ordering::SeqCst), 0);
}
