use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};
use voice_session_core::{AudioHandle, CaptureAdapter, Signal, SignalBus};

/// Bytes of fake encoded audio per second of capture.
pub(crate) const BYTES_PER_SECOND: usize = 16_000;

/// Pretends to capture microphone audio.
pub(crate) struct SimulatedCapture {
    bus: SignalBus,
    encode_delay: Duration,
    /// Turn being captured and when it started.
    current: Option<(u64, Instant)>,
    encoding: Option<JoinHandle<()>>,
}

impl SimulatedCapture {
    pub(crate) fn new(bus: SignalBus, encode_delay: Duration) -> Self {
        Self {
            bus,
            encode_delay,
            current: None,
            encoding: None,
        }
    }

    /// Whether a capture is in progress.
    pub(crate) fn is_capturing(&self) -> bool {
        self.current.is_some()
    }
}

impl CaptureAdapter for SimulatedCapture {
    #[instrument(skip(self))]
    fn start_recording(&mut self, turn: u64) -> bool {
        if let Some((running, _)) = self.current {
            if running == turn {
                warn!("Capture already running");
                return false;
            }

            // The session only starts from Idle, so an older capture was abandoned.
            warn!(orphaned_turn = running, "Discarding capture from an earlier turn");
        }

        self.current = Some((turn, Instant::now()));
        info!("Microphone capture started");
        true
    }

    #[instrument(skip(self))]
    fn stop_recording(&mut self) {
        let Some((turn, started_at)) = self.current.take() else {
            debug!("Stop requested with no capture running");
            return;
        };

        let duration = started_at.elapsed();
        let len = ((duration.as_millis() as usize) * BYTES_PER_SECOND / 1000).max(1);
        let bus = self.bus.clone();
        let delay = self.encode_delay;

        info!(turn, duration_ms = duration.as_millis(), "Microphone capture stopped");

        self.encoding = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let audio = AudioHandle::new(vec![0u8; len]);
            bus.publish(Signal::AudioCaptured { turn, audio });
        }));
    }

    #[instrument(skip(self))]
    fn cancel_recording(&mut self) {
        if let Some((turn, _)) = self.current.take() {
            info!(turn, "Microphone capture cancelled");
        }

        if let Some(handle) = self.encoding.take() {
            // Aborting before the encode delay ends means no audio is reported.
            handle.abort();
            debug!("Pending encode dropped");
        }
    }
}
