//! Control affordance projector.
//!
//! Pure mapping from `(SessionState, Scenario)` to the presentation of the
//! three physical controls. The full triple is rebuilt on every call; no
//! field is ever carried over from a previous state.

use crate::{Scenario, SessionState};

use serde::Serialize;

/// Visual variant of a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleVariant {
    /// Resting appearance.
    Normal,
    /// Highlighted: the control reflects what the session is doing.
    Active,
    /// Waiting on the backend.
    Busy,
    /// Highlighted, and pressing it interrupts playback.
    Interruptible,
}

/// Visual descriptor of a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct VisualStyle {
    /// Variant to render.
    pub variant: StyleVariant,
    /// Caption for the current scenario.
    pub label: &'static str,
}

/// Presentation of a single control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ControlAffordance {
    /// How the control looks.
    pub style: VisualStyle,
    /// Whether presses are ignored.
    pub disabled: bool,
    /// Whether a spinner is shown.
    pub loading: bool,
}

/// The three physical controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    /// Send typed text.
    Text,
    /// Push-to-talk record toggle.
    Record,
    /// Call / interrupt button.
    Call,
}

/// Presentation of every control for one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ControlAffordances {
    /// Text send control.
    pub text_button: ControlAffordance,
    /// Record control.
    pub record_button: ControlAffordance,
    /// Call control.
    pub call_button: ControlAffordance,
}

impl ControlAffordances {
    /// Affordance of one control.
    pub fn get(&self, control: Control) -> ControlAffordance {
        match control {
            Control::Text => self.text_button,
            Control::Record => self.record_button,
            Control::Call => self.call_button,
        }
    }
}

/// Project the controls for `state` in `scenario`.
pub fn project(state: SessionState, scenario: Scenario) -> ControlAffordances {
    use StyleVariant::*;

    match state {
        SessionState::Idle => idle(scenario),
        SessionState::Recording => ControlAffordances {
            text_button: button(Normal, text_label(scenario), true, false),
            record_button: button(Active, record_label(state, scenario), false, false),
            call_button: button(Normal, call_label(state, scenario), true, false),
        },
        SessionState::Processing => ControlAffordances {
            text_button: button(Normal, text_label(scenario), true, true),
            record_button: button(Busy, record_label(state, scenario), true, false),
            call_button: button(Normal, call_label(state, scenario), true, false),
        },
        SessionState::Playing => ControlAffordances {
            text_button: button(Normal, text_label(scenario), false, false),
            record_button: button(Normal, record_label(state, scenario), true, false),
            call_button: button(Interruptible, call_label(state, scenario), false, false),
        },
        SessionState::Interrupted => ControlAffordances {
            text_button: button(Normal, text_label(scenario), true, false),
            record_button: button(Normal, record_label(state, scenario), true, false),
            call_button: button(Active, call_label(state, scenario), true, false),
        },
        #[allow(unreachable_patterns)]
        _ => idle(scenario),
    }
}

/// Project from a mirrored state tag.
///
/// Tags this build does not know fall back to the `Idle` set.
pub fn project_tag(tag: &str, scenario: Scenario) -> ControlAffordances {
    match SessionState::from_tag(tag) {
        Some(state) => project(state, scenario),
        None => idle(scenario),
    }
}

fn idle(scenario: Scenario) -> ControlAffordances {
    let state = SessionState::Idle;

    ControlAffordances {
        text_button: button(StyleVariant::Normal, text_label(scenario), false, false),
        record_button: button(StyleVariant::Normal, record_label(state, scenario), false, false),
        call_button: button(StyleVariant::Normal, call_label(state, scenario), false, false),
    }
}

fn button(
    variant: StyleVariant,
    label: &'static str,
    disabled: bool,
    loading: bool,
) -> ControlAffordance {
    ControlAffordance {
        style: VisualStyle { variant, label },
        disabled,
        loading,
    }
}

fn text_label(scenario: Scenario) -> &'static str {
    match scenario {
        Scenario::TextChat => "Send",
        Scenario::VoiceRecording | Scenario::VoiceCall => "Type instead",
    }
}

fn record_label(state: SessionState, scenario: Scenario) -> &'static str {
    match (scenario, state) {
        (Scenario::VoiceRecording, SessionState::Recording) => "Release to send",
        (Scenario::VoiceRecording, _) => "Hold to talk",
        (_, SessionState::Recording) => "Stop",
        (_, SessionState::Processing) => "Thinking",
        _ => "Record",
    }
}

fn call_label(state: SessionState, scenario: Scenario) -> &'static str {
    match (scenario, state) {
        (_, SessionState::Playing) => "Interrupt",
        (_, SessionState::Interrupted) => "Interrupted",
        (Scenario::VoiceCall, _) => "Start call",
        _ => "Call",
    }
}
