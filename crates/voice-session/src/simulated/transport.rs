use std::{panic::Location, time::Duration};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument};
use voice_session_core::{
    AudioHandle, CoreResult, InterruptSignal, SessionError, Signal, SignalBus, StreamResult,
    TransportAdapter,
};

/// Pretends to stream audio to a speech backend and back.
pub(crate) struct SimulatedTransport {
    bus: SignalBus,
    response_delay: Duration,
    produce_audio: bool,
    fail_interrupt: bool,
}

impl SimulatedTransport {
    pub(crate) fn new(
        bus: SignalBus,
        response_delay: Duration,
        produce_audio: bool,
        fail_interrupt: bool,
    ) -> Self {
        Self {
            bus,
            response_delay,
            produce_audio,
            fail_interrupt,
        }
    }
}

impl TransportAdapter for SimulatedTransport {
    #[instrument(skip(self))]
    fn submit_audio(&mut self, turn: u64, audio: AudioHandle) -> CoreResult<()> {
        if audio.is_empty() {
            return Err(SessionError::TransportFailure {
                reason: "refusing to send an empty recording".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let bus = self.bus.clone();
        let delay = self.response_delay;
        let produce_audio = self.produce_audio;

        debug!(turn, audio_id = %audio.id(), bytes = audio.len(), "Audio submitted");

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let result = if produce_audio {
                // Roughly one byte of speech per byte of question.
                StreamResult::Audio(AudioHandle::new(vec![0u8; audio.len()]))
            } else {
                StreamResult::NoAudio {
                    reason: Some("backend answered with text only".to_string()),
                }
            };
            bus.publish(Signal::ResultReceived { turn, result });
        });

        Ok(())
    }

    #[instrument(skip(self))]
    fn send_interrupt(&mut self, signal: InterruptSignal) -> CoreResult<()> {
        if self.fail_interrupt {
            return Err(SessionError::InterruptTransportFailure {
                reason: "transport disconnected".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let wire = toml::to_string(&signal).map_err(|e| SessionError::InterruptTransportFailure {
            reason: format!("Failed to encode interrupt: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(
            session_id = %signal.session_id,
            client_id = %signal.client_id,
            "Interrupt notice sent"
        );
        debug!(wire = %wire, "Interrupt payload");

        Ok(())
    }
}
