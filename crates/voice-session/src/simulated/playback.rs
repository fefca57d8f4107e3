use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};
use voice_session_core::{AudioHandle, PlaybackAdapter, Signal, SignalBus};

/// Pretends to play synthesized speech.
pub(crate) struct SimulatedPlayback {
    bus: SignalBus,
    duration: Duration,
    current: Option<JoinHandle<()>>,
}

impl SimulatedPlayback {
    pub(crate) fn new(bus: SignalBus, duration: Duration) -> Self {
        Self {
            bus,
            duration,
            current: None,
        }
    }
}

impl PlaybackAdapter for SimulatedPlayback {
    #[instrument(skip(self))]
    fn play(&mut self, turn: u64, audio: AudioHandle) {
        self.stop_playback();

        let bus = self.bus.clone();
        let duration = self.duration;

        info!(turn, audio_id = %audio.id(), "Playback started");

        self.current = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            bus.publish(Signal::PlaybackFinished { turn });
        }));
    }

    fn stop_playback(&mut self) {
        if let Some(handle) = self.current.take() {
            // Aborting before the sleep ends means no "finished" is reported.
            handle.abort();
            debug!("Playback stopped");
        }
    }
}

impl Drop for SimulatedPlayback {
    fn drop(&mut self) {
        self.stop_playback();
    }
}
