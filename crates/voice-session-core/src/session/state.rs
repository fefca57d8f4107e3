use std::{fmt, time::SystemTime};

use serde::{Deserialize, Serialize};

/// Authoritative state of a voice session.
///
/// Exactly one value is current at any instant. Only
/// [`SessionStateMachine`](crate::SessionStateMachine) writes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum SessionState {
    /// Ready for a new turn.
    #[default]
    Idle,
    /// Microphone capture is running.
    Recording,
    /// Captured audio is being transcribed and answered.
    Processing,
    /// Synthesized speech is playing back.
    Playing,
    /// Playback was cut short by the user; returns to `Idle` after the settle delay.
    Interrupted,
}

impl SessionState {
    /// Every state, in declaration order.
    pub const ALL: [SessionState; 5] = [
        SessionState::Idle,
        SessionState::Recording,
        SessionState::Processing,
        SessionState::Playing,
        SessionState::Interrupted,
    ];

    /// Stable tag used when the state is mirrored outside the core.
    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Recording => "recording",
            SessionState::Processing => "processing",
            SessionState::Playing => "playing",
            SessionState::Interrupted => "interrupted",
        }
    }

    /// Parse a mirrored tag. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|state| state.as_str() == tag)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which UI surface is presenting the controls.
///
/// Supplied by the caller; orthogonal to [`SessionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Typed chat with an optional record button.
    TextChat,
    /// Push-to-talk recording.
    VoiceRecording,
    /// Continuous call.
    #[default]
    VoiceCall,
}

impl Scenario {
    /// Parse a scenario name as written in config or typed on the console.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "text_chat" | "text" => Some(Scenario::TextChat),
            "voice_recording" | "recording" => Some(Scenario::VoiceRecording),
            "voice_call" | "call" => Some(Scenario::VoiceCall),
            _ => None,
        }
    }
}

/// Published after every committed transition, in commit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChangeEvent {
    /// State before the transition.
    pub previous: SessionState,
    /// State after the transition.
    pub next: SessionState,
    /// Wall-clock time the transition was committed.
    pub at: SystemTime,
}
