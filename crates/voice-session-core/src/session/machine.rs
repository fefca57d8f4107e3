//! Session state machine.
//!
//! Sole owner of [`SessionState`] and the interrupted flag. Every write goes
//! through [`SessionStateMachine::set_state`], which rejects transitions that
//! are not in the table below and leaves the state untouched when it does.
//!
//! | From        | To          | Trigger                                  |
//! |-------------|-------------|------------------------------------------|
//! | Idle        | Recording   | user starts capture                      |
//! | Recording   | Processing  | capture adapter reports audio ready      |
//! | Processing  | Playing     | transport delivers playable audio        |
//! | Processing  | Idle        | backend completes with no audio          |
//! | Playing     | Idle        | playback adapter reports finished        |
//! | Playing     | Interrupted | user requests interrupt                  |
//! | Interrupted | Idle        | settle delay elapses                     |
//! | any         | Idle        | explicit [`reset`](SessionStateMachine::reset) |

use crate::{CoreResult, SessionError, SessionState, Signal, SignalBus, StateChangeEvent};

use std::{panic::Location, time::SystemTime};

use error_location::ErrorLocation;
use tokio::sync::watch;
use tracing::{debug, info, instrument};

/// Whether `from -> to` is a table transition (excluding `reset`).
pub fn is_legal_transition(from: SessionState, to: SessionState) -> bool {
    use SessionState::*;

    matches!(
        (from, to),
        (Idle, Recording)
            | (Recording, Processing)
            | (Processing, Playing)
            | (Processing, Idle)
            | (Playing, Idle)
            | (Playing, Interrupted)
            | (Interrupted, Idle)
    )
}

/// Guarded session state machine.
///
/// Not thread-safe by itself: it is owned by a single coordinator and
/// mutated in response to one signal at a time. Other components read the
/// state through [`reader`](Self::reader) or `StateChanged` signals.
///
/// The machine keeps no clock. The return from `Interrupted` to `Idle`
/// happens only when [`settle`](Self::settle) is called with the current
/// [`interrupt_epoch`](Self::interrupt_epoch); the
/// [`SessionCoordinator`](crate::SessionCoordinator) arms that timer on
/// every interrupt. A machine driven without a coordinator must call
/// `settle` itself or it stays `Interrupted`.
pub struct SessionStateMachine {
    state: SessionState,
    interrupted: bool,
    /// Incremented on every entry to `Recording`; ties adapter signals to one turn.
    turn: u64,
    /// Incremented on every entry to `Interrupted`; ties a settle timer to one interrupt.
    interrupt_epoch: u64,
    bus: SignalBus,
    state_tx: watch::Sender<SessionState>,
}

impl SessionStateMachine {
    /// Create a machine in `Idle` that publishes onto `bus`.
    pub fn new(bus: SignalBus) -> Self {
        let (state_tx, _) = watch::channel(SessionState::Idle);

        Self {
            state: SessionState::Idle,
            interrupted: false,
            turn: 0,
            interrupt_epoch: 0,
            bus,
            state_tx,
        }
    }

    /// Current state.
    pub fn current(&self) -> SessionState {
        self.state
    }

    /// Whether the session is inside an interrupt.
    pub fn is_interrupted(&self) -> bool {
        self.interrupted
    }

    /// Turn of the most recent recording. Zero before the first one.
    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// Turn the next recording will be given.
    pub fn next_turn(&self) -> u64 {
        self.turn + 1
    }

    /// Epoch of the most recent interrupt.
    pub fn interrupt_epoch(&self) -> u64 {
        self.interrupt_epoch
    }

    /// Read-only view that always holds a fully committed state.
    pub fn reader(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// True iff a recording may start now.
    pub fn can_start_recording(&self) -> bool {
        self.state == SessionState::Idle
    }

    /// True iff playback may be interrupted now.
    pub fn can_interrupt(&self) -> bool {
        self.state == SessionState::Playing
    }

    /// Transition to `next` if the table allows it.
    ///
    /// On success the entry action for `next` runs and a
    /// [`StateChangeEvent`] is published.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` and leaves the state unchanged when
    /// `current() -> next` is not in the table.
    #[track_caller]
    #[instrument(skip(self), fields(from = %self.state))]
    pub fn set_state(&mut self, next: SessionState) -> CoreResult<()> {
        if !is_legal_transition(self.state, next) {
            return Err(SessionError::InvalidTransition {
                from: self.state,
                to: next,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.commit(next);

        Ok(())
    }

    /// `Idle -> Recording`. Returns `false` without error if not idle.
    pub fn start_recording(&mut self) -> bool {
        if !self.can_start_recording() {
            debug!(state = %self.state, "start_recording ignored");
            return false;
        }

        self.commit(SessionState::Recording);
        true
    }

    /// `Recording -> Processing`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if not recording.
    #[track_caller]
    pub fn start_processing(&mut self) -> CoreResult<()> {
        self.set_state(SessionState::Processing)
    }

    /// `Processing -> Playing`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if not processing.
    #[track_caller]
    pub fn start_playing(&mut self) -> CoreResult<()> {
        self.set_state(SessionState::Playing)
    }

    /// `Processing -> Idle` when the backend finished with nothing to play.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if not processing.
    #[track_caller]
    pub fn complete_without_audio(&mut self) -> CoreResult<()> {
        self.guarded(SessionState::Processing, SessionState::Idle)
    }

    /// `Playing -> Idle`. Idempotent: a no-op returning `false` otherwise.
    pub fn finish_playing(&mut self) -> bool {
        if self.state != SessionState::Playing {
            debug!(state = %self.state, "finish_playing ignored");
            return false;
        }

        self.commit(SessionState::Idle);
        true
    }

    /// `Playing -> Interrupted`. Returns `false` without error if not playing.
    pub fn interrupt(&mut self) -> bool {
        if !self.can_interrupt() {
            debug!(state = %self.state, "interrupt ignored");
            return false;
        }

        self.commit(SessionState::Interrupted);
        true
    }

    /// `Interrupted -> Idle` for the interrupt identified by `epoch`.
    ///
    /// Stale epochs, or a session that already left `Interrupted`, are a
    /// no-op returning `false`.
    pub fn settle(&mut self, epoch: u64) -> bool {
        if self.state != SessionState::Interrupted || epoch != self.interrupt_epoch {
            debug!(
                state = %self.state,
                epoch,
                current_epoch = self.interrupt_epoch,
                "Stale settle ignored"
            );
            return false;
        }

        self.commit(SessionState::Idle);
        true
    }

    /// Return to `Idle` from any state and clear the interrupted flag.
    pub fn reset(&mut self) {
        self.commit(SessionState::Idle);
    }

    #[track_caller]
    fn guarded(&mut self, from: SessionState, to: SessionState) -> CoreResult<()> {
        if self.state != from {
            return Err(SessionError::InvalidTransition {
                from: self.state,
                to,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.commit(to);
        Ok(())
    }

    fn commit(&mut self, next: SessionState) {
        let previous = self.state;
        self.state = next;
        self.enter(next);

        // send_replace stores the value even with no receivers alive.
        self.state_tx.send_replace(next);

        let event = StateChangeEvent {
            previous,
            next,
            at: SystemTime::now(),
        };
        self.bus.publish(Signal::StateChanged(event));

        info!(from = %previous, to = %next, "Session state changed");
    }

    fn enter(&mut self, next: SessionState) {
        match next {
            SessionState::Idle => {
                self.interrupted = false;
                debug!(affordances = "idle", "Entered state");
            }
            SessionState::Recording => {
                self.turn += 1;
                debug!(affordances = "recording", turn = self.turn, "Entered state")
            }
            SessionState::Processing => debug!(affordances = "busy", "Entered state"),
            SessionState::Playing => {
                debug!(affordances = "playing, interruptible", "Entered state")
            }
            SessionState::Interrupted => {
                self.interrupted = true;
                self.interrupt_epoch += 1;
                debug!(
                    affordances = "interrupted",
                    epoch = self.interrupt_epoch,
                    "Entered state"
                );
            }
        }
    }
}
