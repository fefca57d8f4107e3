use crate::{AudioHandle, CoreResult};

use std::time::SystemTime;

use serde::Serialize;
use uuid::Uuid;

/// Interrupt notice sent to the backend so it stops generating speech.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InterruptSignal {
    /// Session being interrupted.
    pub session_id: Uuid,
    /// Client that requested the interrupt.
    pub client_id: Uuid,
    /// When the interrupt was requested.
    pub timestamp: SystemTime,
}

/// Network transport to the speech backend.
///
/// Publishes [`Signal::ResultReceived`](crate::Signal::ResultReceived) when
/// the streamed result for submitted audio is complete, tagged with the turn
/// the audio was submitted for.
pub trait TransportAdapter: Send {
    /// Hand the audio captured for `turn` to the backend.
    ///
    /// # Errors
    ///
    /// Returns `TransportFailure` if the audio could not be queued for sending.
    fn submit_audio(&mut self, turn: u64, audio: AudioHandle) -> CoreResult<()>;

    /// Best-effort interrupt notice. Never retried.
    ///
    /// # Errors
    ///
    /// Returns `InterruptTransportFailure` if the notice could not be sent.
    fn send_interrupt(&mut self, signal: InterruptSignal) -> CoreResult<()>;
}
