use crate::actions::ActionRegistry;

use std::{collections::BTreeMap, fmt};

/// Non-fatal problem found while resolving key bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationWarning {
    /// The binding names an action the registry does not know.
    UnknownAction {
        /// Action identifier from the binding table.
        action_id: String,
        /// Key descriptor that will not be bound.
        descriptor: String,
    },
    /// The capture backend cannot map the key descriptor.
    UnmappedKey {
        /// Action identifier from the binding table.
        action_id: String,
        /// Key descriptor the backend rejected.
        descriptor: String,
    },
}

impl fmt::Display for ConfigurationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationWarning::UnknownAction {
                action_id,
                descriptor,
            } => write!(
                f,
                "Action '{}' not found, hotkey '{}' will not work",
                action_id, descriptor
            ),
            ConfigurationWarning::UnmappedKey {
                action_id,
                descriptor,
            } => write!(
                f,
                "Key '{}' for action '{}' has no mapping, hotkey will not work",
                descriptor, action_id
            ),
        }
    }
}

/// A binding that resolved to a registered action and a backend key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveBinding<K> {
    /// Action identifier.
    pub action_id: String,
    /// Key descriptor as configured.
    pub descriptor: String,
    /// Label of the bound action.
    pub label: String,
    /// Backend-specific key.
    pub key: K,
}

/// Outcome of resolving the binding table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingPlan<K> {
    /// Bindings to register with the capture backend.
    pub active: Vec<ActiveBinding<K>>,
    /// Problems to report at startup.
    pub warnings: Vec<ConfigurationWarning>,
}

/// Resolve `bindings` (action id to key descriptor) against the registry and
/// a backend key resolver. Empty descriptors are skipped silently.
pub fn plan_bindings<K>(
    bindings: &BTreeMap<String, String>,
    registry: &ActionRegistry,
    resolve: impl Fn(&str) -> Option<K>,
) -> BindingPlan<K> {
    let mut plan = BindingPlan {
        active: Vec::new(),
        warnings: Vec::new(),
    };

    for (action_id, descriptor) in bindings {
        let descriptor = descriptor.trim();
        if descriptor.is_empty() {
            continue;
        }

        let Some(action) = registry.get(action_id) else {
            plan.warnings.push(ConfigurationWarning::UnknownAction {
                action_id: action_id.clone(),
                descriptor: descriptor.to_string(),
            });
            continue;
        };

        match resolve(descriptor) {
            Some(key) => plan.active.push(ActiveBinding {
                action_id: action_id.clone(),
                descriptor: descriptor.to_string(),
                label: action.label().to_string(),
                key,
            }),
            None => plan.warnings.push(ConfigurationWarning::UnmappedKey {
                action_id: action_id.clone(),
                descriptor: descriptor.to_string(),
            }),
        }
    }

    plan
}
