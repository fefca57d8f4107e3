use crate::StateChangeEvent;

use std::{fmt, sync::Arc};

use uuid::Uuid;

/// Every event shape that travels over the [`SignalBus`](crate::SignalBus).
///
/// Adapter signals carry the turn they belong to so that a signal from an
/// abandoned turn is never applied to the one that replaced it.
#[derive(Debug, Clone)]
pub enum Signal {
    /// A user pressed a control.
    Intent(UserIntent),
    /// Capture adapter finished recording.
    AudioCaptured {
        /// Turn the capture was started for.
        turn: u64,
        /// Encoded recording.
        audio: AudioHandle,
    },
    /// Transport delivered the streamed backend result.
    ResultReceived {
        /// Turn whose audio produced this result.
        turn: u64,
        /// What the backend answered.
        result: StreamResult,
    },
    /// Playback adapter finished playing naturally.
    PlaybackFinished {
        /// Turn whose answer was playing.
        turn: u64,
    },
    /// State machine committed a transition.
    StateChanged(StateChangeEvent),
    /// Settle delay for the interrupt identified by `epoch` has elapsed.
    SettleElapsed {
        /// Interrupt epoch the timer was armed for.
        epoch: u64,
    },
}

/// User intent produced by the control binder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserIntent {
    /// Begin capturing.
    Start,
    /// Stop capturing and send the audio.
    Stop,
    /// Cut playback short.
    Interrupt,
    /// Abandon whatever is in flight and return to idle.
    Reset,
}

/// Result of a backend round trip as reported by the transport.
#[derive(Debug, Clone)]
pub enum StreamResult {
    /// Synthesized speech ready for playback.
    Audio(AudioHandle),
    /// Completed with nothing to play. Backend errors are reported this way.
    NoAudio {
        /// Backend-supplied reason, if any.
        reason: Option<String>,
    },
}

/// Opaque reference to an audio payload owned by an adapter.
///
/// Cloning is cheap; the payload is shared.
#[derive(Clone, PartialEq, Eq)]
pub struct AudioHandle {
    id: Uuid,
    payload: Arc<[u8]>,
}

impl AudioHandle {
    /// Wrap an encoded payload.
    pub fn new(payload: impl Into<Arc<[u8]>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            payload: payload.into(),
        }
    }

    /// Unique id for log correlation.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Raw payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

// Payloads can be megabytes; keep them out of logs.
impl fmt::Debug for AudioHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioHandle")
            .field("id", &self.id)
            .field("len", &self.payload.len())
            .finish()
    }
}
