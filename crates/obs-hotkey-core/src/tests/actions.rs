use crate::{
    ReconnectPolicy, SessionManager, Supervisor,
    actions::{
        Action, ActionOutcome, ActionRegistry, ConfigurationWarning, TOGGLE_PAUSE,
        TOGGLE_RECORDING, ToggleStyle, display_label, plan_bindings, titleize,
    },
    tests::support::{Endpoint, FakeConnector},
};

use std::{collections::BTreeMap, sync::Arc};

fn builtin_registry(style: ToggleStyle) -> (FakeConnector, ActionRegistry) {
    let connector = FakeConnector::new(Endpoint::default());
    let supervisor = Arc::new(Supervisor::new(
        SessionManager::new(connector.clone()),
        ReconnectPolicy::default(),
    ));
    (
        connector,
        ActionRegistry::builtin(supervisor, style, &BTreeMap::new()),
    )
}

fn bindings(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(action, key)| (action.to_string(), key.to_string()))
        .collect()
}

/// WHAT: Identifiers titleize word by word
/// WHY: Labels fall back to this when none is configured
#[test]
fn given_snake_case_id_when_titleizing_then_words_capitalised() {
    assert_eq!(titleize("toggle_recording"), "Toggle Recording");
    assert_eq!(titleize("save_replay_buffer"), "Save Replay Buffer");
    assert_eq!(titleize("PAUSE"), "Pause");
}

/// WHAT: Configured labels win over the titleized fallback
/// WHY: Users customise the banner text
#[test]
fn given_configured_label_when_resolving_then_configured_label_used() {
    // Given: One configured label and one blank label
    let labels = bindings(&[
        ("toggle_pause", "Toggle Pause/Resume Recording"),
        ("toggle_streaming", "  "),
    ]);

    // When/Then: Configured label is used, blanks fall back
    assert_eq!(
        display_label("toggle_pause", &labels),
        "Toggle Pause/Resume Recording"
    );
    assert_eq!(
        display_label("toggle_streaming", &labels),
        "Toggle Streaming"
    );
}

/// WHAT: Bindings to unknown actions warn and are never bound
/// WHY: A typo in the binding table must not silently do nothing
#[test]
fn given_binding_for_unknown_action_when_planning_then_warning_and_not_active() {
    // Given: Built-in actions and a binding naming an unregistered action
    let (_connector, registry) = builtin_registry(ToggleStyle::ServerSide);
    let table = bindings(&[("toggle_recording", "insert"), ("toggle_scene", "end")]);

    // When: Planning
    let plan = plan_bindings(&table, &registry, |key| Some(key.to_string()));

    // Then: Only the known action is bound
    assert_eq!(plan.active.len(), 1);
    assert_eq!(plan.active[0].action_id, "toggle_recording");
    assert_eq!(plan.active[0].label, "Toggle Recording");
    assert_eq!(
        plan.warnings,
        vec![ConfigurationWarning::UnknownAction {
            action_id: "toggle_scene".to_string(),
            descriptor: "end".to_string(),
        }]
    );
}

/// WHAT: Keys the backend cannot map warn; empty descriptors are skipped
/// WHY: Unbound actions are normal, unmappable keys are mistakes
#[test]
fn given_unmapped_and_empty_descriptors_when_planning_then_only_unmapped_warns() {
    // Given: One unmappable key and one unbound action
    let (_connector, registry) = builtin_registry(ToggleStyle::ServerSide);
    let table = bindings(&[("toggle_pause", "hyper+q"), ("toggle_streaming", "")]);

    // When: Planning with a resolver that knows nothing
    let plan = plan_bindings(&table, &registry, |_| None::<u32>);

    // Then: One warning, no active bindings
    assert!(plan.active.is_empty());
    assert_eq!(
        plan.warnings,
        vec![ConfigurationWarning::UnmappedKey {
            action_id: "toggle_pause".to_string(),
            descriptor: "hyper+q".to_string(),
        }]
    );
}

/// WHAT: Registering an id twice keeps only the latest action
/// WHY: At most one operation per action identifier
#[test]
fn given_duplicate_id_when_registering_then_previous_replaced() {
    // Given: An empty registry
    let mut registry = ActionRegistry::new();
    assert!(registry.is_empty());

    // When: Registering the same id twice
    let first = registry.register(Action::new("noop", "First", || async {
        Ok(ActionOutcome::Skipped { reason: "first" })
    }));
    let second = registry.register(Action::new("noop", "Second", || async {
        Ok(ActionOutcome::Skipped { reason: "second" })
    }));

    // Then: The second replaced the first
    assert!(first.is_none());
    assert_eq!(second.map(|a| a.label().to_string()).as_deref(), Some("First"));
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("noop").map(Action::label), Some("Second"));
}

/// WHAT: Server-side style sends the endpoint's own toggle requests
/// WHY: It avoids the read-then-act race of the status-query style
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_server_side_style_when_invoking_toggles_then_single_toggle_requests() {
    // Given: Built-in actions in server-side style
    let (connector, registry) = builtin_registry(ToggleStyle::ServerSide);

    // When: Invoking both toggles
    let record = registry.get(TOGGLE_RECORDING).unwrap().invoke().await.unwrap();
    let pause = registry.get(TOGGLE_PAUSE).unwrap().invoke().await.unwrap();

    // Then: No status queries, one request each
    assert_eq!(
        record,
        ActionOutcome::Sent {
            request_type: "ToggleRecord"
        }
    );
    assert_eq!(
        pause,
        ActionOutcome::Sent {
            request_type: "ToggleRecordPause"
        }
    );
    assert_eq!(
        connector.script().requests(),
        vec!["ToggleRecord", "ToggleRecordPause"]
    );
}

/// WHAT: The built-in registry exposes every built-in action id
/// WHY: Default bindings refer to these ids
#[test]
fn given_builtin_registry_when_listing_then_all_builtin_ids_present() {
    let (_connector, registry) = builtin_registry(ToggleStyle::StatusQuery);

    let ids: Vec<&str> = registry.ids().collect();

    assert_eq!(
        ids,
        vec![
            "save_replay_buffer",
            "start_recording",
            "stop_recording",
            "toggle_pause",
            "toggle_recording",
            "toggle_streaming",
        ]
    );
}
