mod action;
mod binding;
mod label;
mod registry;

pub use {
    action::{Action, ActionOutcome},
    binding::{ActiveBinding, BindingPlan, ConfigurationWarning, plan_bindings},
    label::{display_label, titleize},
    registry::{
        ActionRegistry, SAVE_REPLAY_ACTION, START_RECORDING_ACTION, STOP_RECORDING_ACTION,
        TOGGLE_PAUSE, TOGGLE_RECORDING, TOGGLE_STREAMING, ToggleStyle,
    },
};
