//! Session coordinator.
//!
//! Turns adapter signals and user intents into state machine operations and
//! owns the interrupt protocol. Signals that no longer match the current
//! state or turn are dropped and logged; they are ordinary interleavings of
//! independent sources, never session failures.

use crate::{
    AudioHandle, CaptureAdapter, InterruptSignal, PlaybackAdapter, SessionContext, SessionError,
    SessionState, SessionStateMachine, Signal, StreamResult, Subscription, TransportAdapter,
    UserIntent,
};

use std::{
    panic::Location,
    time::{Duration, SystemTime},
};

use error_location::ErrorLocation;
use tokio::{runtime::Handle, sync::watch};
use tracing::{debug, error, info, instrument, warn};

/// How long `Interrupted` is shown before returning to `Idle`.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Coordinator tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Delay before `Interrupted` auto-returns to `Idle`. May be zero.
    pub settle_delay: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

/// Bridges adapters and user intents to the [`SessionStateMachine`].
pub struct SessionCoordinator {
    context: SessionContext,
    machine: SessionStateMachine,
    inbox: Subscription,
    capture: Box<dyn CaptureAdapter>,
    transport: Box<dyn TransportAdapter>,
    playback: Box<dyn PlaybackAdapter>,
    config: CoordinatorConfig,
}

impl SessionCoordinator {
    /// Create a coordinator and subscribe it to the session bus.
    pub fn new(
        context: SessionContext,
        capture: Box<dyn CaptureAdapter>,
        transport: Box<dyn TransportAdapter>,
        playback: Box<dyn PlaybackAdapter>,
        config: CoordinatorConfig,
    ) -> Self {
        let inbox = context.bus().subscribe();
        let machine = SessionStateMachine::new(context.bus().clone());

        Self {
            context,
            machine,
            inbox,
            capture,
            transport,
            playback,
            config,
        }
    }

    /// The state machine this coordinator drives.
    pub fn machine(&self) -> &SessionStateMachine {
        &self.machine
    }

    /// Non-blocking reader of the committed state.
    pub fn state_reader(&self) -> watch::Receiver<SessionState> {
        self.machine.reader()
    }

    /// Process signals until shutdown is requested or the bus closes.
    pub async fn run(mut self, mut shutdown_rx: watch::Receiver<bool>) {
        info!(session_id = %self.context.session_id(), "Session coordinator started");

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Session coordinator shutting down");
                    break;
                }
                signal = self.inbox.recv() => match signal {
                    Some(signal) => self.handle_signal(signal),
                    None => {
                        info!("Signal bus closed, stopping coordinator");
                        break;
                    }
                },
            }
        }

        self.context.bus().unsubscribe(self.inbox.id());
    }

    /// Handle every signal already queued, including ones published while
    /// handling. Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;

        while let Some(signal) = self.inbox.try_recv() {
            self.handle_signal(signal);
            handled += 1;
        }

        handled
    }

    /// Apply one signal.
    pub fn handle_signal(&mut self, signal: Signal) {
        match signal {
            Signal::Intent(intent) => self.on_intent(intent),
            Signal::AudioCaptured { turn, audio } => self.on_audio_captured(turn, audio),
            Signal::ResultReceived { turn, result } => self.on_result(turn, result),
            Signal::PlaybackFinished { turn } => self.on_playback_finished(turn),
            Signal::SettleElapsed { epoch } => {
                self.machine.settle(epoch);
            }
            // Our own echo.
            Signal::StateChanged(_) => {}
        }
    }

    fn on_intent(&mut self, intent: UserIntent) {
        match intent {
            UserIntent::Start => self.on_start(),
            UserIntent::Stop => self.on_stop(),
            UserIntent::Interrupt => self.on_interrupt(),
            UserIntent::Reset => self.on_reset(),
        }
    }

    #[instrument(skip(self))]
    fn on_start(&mut self) {
        if !self.machine.can_start_recording() {
            self.drop_signal("start requested while not idle");
            return;
        }

        // Adapter first: never claim Recording for a capture that did not begin.
        if !self.capture.start_recording(self.machine.next_turn()) {
            warn!("Capture adapter did not start recording");
            return;
        }

        self.machine.start_recording();
    }

    #[instrument(skip(self))]
    fn on_stop(&mut self) {
        if self.machine.current() != SessionState::Recording {
            self.drop_signal("stop requested while not recording");
            return;
        }

        // The resulting AudioCaptured signal drives Recording -> Processing.
        self.capture.stop_recording();
    }

    #[instrument(skip(self))]
    fn on_interrupt(&mut self) {
        if !self.machine.can_interrupt() {
            self.drop_signal("interrupt requested while not playing");
            return;
        }

        self.playback.stop_playback();

        if !self.machine.interrupt() {
            return;
        }
        self.arm_settle_timer();

        let notice = InterruptSignal {
            session_id: self.context.session_id(),
            client_id: self.context.client_id(),
            timestamp: SystemTime::now(),
        };

        if let Err(e) = self.transport.send_interrupt(notice) {
            warn!(error = %e, "Interrupt notice not delivered; local stop stands");
        }
    }

    #[instrument(skip(self))]
    fn on_reset(&mut self) {
        // A stop may already be encoding, so the capture is cancelled even
        // after the user pressed stop.
        match self.machine.current() {
            SessionState::Recording => self.capture.cancel_recording(),
            SessionState::Playing => self.playback.stop_playback(),
            _ => {}
        }

        self.machine.reset();
    }

    #[instrument(skip(self))]
    fn on_audio_captured(&mut self, turn: u64, audio: AudioHandle) {
        if turn != self.machine.turn() {
            self.drop_signal("captured audio belongs to an earlier turn");
            return;
        }

        if self.machine.current() != SessionState::Recording {
            self.drop_signal("captured audio arrived while not recording");
            return;
        }

        if let Err(e) = self.machine.start_processing() {
            error!(error = %e, "Failed to enter processing");
            return;
        }

        if let Err(e) = self.transport.submit_audio(turn, audio) {
            error!(error = %e, "Failed to submit audio, returning to idle");
            self.complete_without_audio();
        }
    }

    #[instrument(skip(self))]
    fn on_result(&mut self, turn: u64, result: StreamResult) {
        if turn != self.machine.turn() {
            self.drop_signal("result belongs to an earlier turn");
            return;
        }

        if self.machine.current() != SessionState::Processing {
            self.drop_signal("result arrived while not processing");
            return;
        }

        match result {
            StreamResult::Audio(audio) => match self.machine.start_playing() {
                Ok(()) => self.playback.play(turn, audio),
                Err(e) => error!(error = %e, "Failed to enter playing"),
            },
            StreamResult::NoAudio { reason } => {
                if let Some(reason) = reason {
                    info!(reason = %reason, "Backend finished without audio");
                }
                self.complete_without_audio();
            }
        }
    }

    fn on_playback_finished(&mut self, turn: u64) {
        if turn != self.machine.turn() {
            self.drop_signal("playback finished for an earlier turn");
            return;
        }

        if !self.machine.finish_playing() {
            debug!(state = %self.machine.current(), "Duplicate or late playback finish");
        }
    }

    fn complete_without_audio(&mut self) {
        if let Err(e) = self.machine.complete_without_audio() {
            error!(error = %e, "Failed to return to idle");
        }
    }

    // The timer is detached and cannot be cancelled; a stale epoch is
    // rejected by the machine instead.
    fn arm_settle_timer(&self) {
        let epoch = self.machine.interrupt_epoch();
        let delay = self.config.settle_delay;
        let bus = self.context.bus().clone();

        if delay.is_zero() {
            bus.publish(Signal::SettleElapsed { epoch });
            return;
        }

        match Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    bus.publish(Signal::SettleElapsed { epoch });
                });
            }
            Err(e) => {
                // Without a timer the session would stay Interrupted.
                warn!(error = %e, epoch, "No async runtime for the settle delay, settling now");
                bus.publish(Signal::SettleElapsed { epoch });
            }
        }
    }

    #[track_caller]
    fn drop_signal(&self, reason: &str) {
        let dropped = SessionError::AdapterSignalDropped {
            reason: reason.to_string(),
            location: ErrorLocation::from(Location::caller()),
        };
        debug!(state = %self.machine.current(), error = %dropped, "Signal dropped");
    }
}
