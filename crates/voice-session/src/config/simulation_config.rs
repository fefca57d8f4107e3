use crate::config::{
    default_capture_ms, default_playback_ms, default_response_delay_ms, default_true,
};

use serde::{Deserialize, Serialize};

/// Timing of the simulated capture, backend and playback adapters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Delay between stopping capture and the audio being reported.
    #[serde(default = "default_capture_ms")]
    pub capture_ms: u64,

    /// Backend round-trip time.
    #[serde(default = "default_response_delay_ms")]
    pub response_delay_ms: u64,

    /// Length of synthesized speech.
    #[serde(default = "default_playback_ms")]
    pub playback_ms: u64,

    /// Whether the backend answers with speech (false = text-only results).
    #[serde(default = "default_true")]
    pub produce_audio: bool,

    /// Force interrupt notices to fail, exercising the best-effort path.
    #[serde(default)]
    pub fail_interrupt_send: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            capture_ms: default_capture_ms(),
            response_delay_ms: default_response_delay_ms(),
            playback_ms: default_playback_ms(),
            produce_audio: true,
            fail_interrupt_send: false,
        }
    }
}
