mod binder;
mod context;
mod coordinator;
mod machine;
mod projector;
mod state;
mod state_mirror;

pub use {
    binder::{ControlBinder, ControlSurface, intent_for},
    context::SessionContext,
    coordinator::{CoordinatorConfig, DEFAULT_SETTLE_DELAY, SessionCoordinator},
    machine::{SessionStateMachine, is_legal_transition},
    projector::{
        Control, ControlAffordance, ControlAffordances, StyleVariant, VisualStyle, project,
        project_tag,
    },
    state::{Scenario, SessionState, StateChangeEvent},
    state_mirror::{StateMirror, WatchStateMirror, spawn_state_mirror},
};
