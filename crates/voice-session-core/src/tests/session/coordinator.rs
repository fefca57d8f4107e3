use crate::{
    AudioHandle, Scenario, SessionState, Signal, StreamResult, StyleVariant, Subscription,
    UserIntent, project,
    tests::support::{Behaviour, Harness},
};

use std::time::Duration;

use tokio::sync::watch;

fn audio() -> AudioHandle {
    AudioHandle::new(vec![0u8; 32])
}

#[allow(clippy::unwrap_used)]
async fn next_state(events: &mut Subscription) -> SessionState {
    loop {
        if let Signal::StateChanged(event) = events.recv().await.unwrap() {
            return event.next;
        }
    }
}

/// WHAT: Full record -> process -> play -> idle cycle with matching affordances
/// WHY: The controls must track what the session is actually doing
#[test]
fn given_idle_when_running_recording_flow_then_states_and_controls_follow() {
    // Given: An idle session in the text chat scenario
    let mut h = Harness::new(Behaviour::default());
    let scenario = Scenario::TextChat;

    // When: The user starts recording and the adapter confirms
    h.step(Signal::Intent(UserIntent::Start));

    // Then: Recording, record enabled + active, text disabled
    assert_eq!(h.state(), SessionState::Recording);
    let controls = project(h.state(), scenario);
    assert!(!controls.record_button.disabled);
    assert_eq!(controls.record_button.style.variant, StyleVariant::Active);
    assert!(controls.text_button.disabled);

    // When: The user stops and the capture adapter reports audio
    h.step(Signal::Intent(UserIntent::Stop));
    assert_eq!(h.state(), SessionState::Recording);
    h.audio_captured(audio());

    // Then: Processing, everything disabled, text loading
    assert_eq!(h.state(), SessionState::Processing);
    let controls = project(h.state(), scenario);
    assert!(controls.text_button.disabled && controls.text_button.loading);
    assert!(controls.record_button.disabled);
    assert!(controls.call_button.disabled);

    // When: The transport delivers playable audio
    h.result_received(StreamResult::Audio(audio()));

    // Then: Playing, call enabled and highlighted
    assert_eq!(h.state(), SessionState::Playing);
    let controls = project(h.state(), scenario);
    assert!(!controls.call_button.disabled);
    assert_eq!(
        controls.call_button.style.variant,
        StyleVariant::Interruptible
    );

    // When: Playback finishes
    h.playback_finished();

    // Then: Idle, everything enabled
    assert_eq!(h.state(), SessionState::Idle);
    let controls = project(h.state(), scenario);
    assert!(!controls.text_button.disabled);
    assert!(!controls.record_button.disabled);
    assert!(!controls.call_button.disabled);

    // And: Adapters were driven once each
    let log = h.log();
    assert_eq!(log.capture_starts, 1);
    assert_eq!(log.capture_stops, 1);
    assert_eq!(log.submitted.len(), 1);
    assert_eq!(log.played.len(), 1);
}

/// WHAT: State stays Idle when the capture adapter fails to start
/// WHY: The machine must never claim Recording for a capture that never began
#[test]
fn given_failing_capture_when_starting_then_state_remains_idle() {
    // Given: A capture adapter that refuses to start
    let mut h = Harness::new(Behaviour {
        capture_starts: false,
        ..Behaviour::default()
    });

    // When: The user starts
    h.step(Signal::Intent(UserIntent::Start));

    // Then: The adapter was asked, but the session is still Idle
    assert_eq!(h.log().capture_starts, 1);
    assert_eq!(h.state(), SessionState::Idle);
    assert!(h.transitions().is_empty());
}

/// WHAT: Start while not Idle never reaches the capture adapter
/// WHY: Repeated presses must not restart capture mid-turn
#[test]
fn given_recording_when_start_pressed_again_then_adapter_not_called() {
    // Given: A recording session
    let mut h = Harness::new(Behaviour::default());
    h.step(Signal::Intent(UserIntent::Start));

    // When: Start is requested again
    h.step(Signal::Intent(UserIntent::Start));

    // Then: Still one adapter start
    assert_eq!(h.log().capture_starts, 1);
    assert_eq!(h.state(), SessionState::Recording);
}

/// WHAT: A stray result while Recording is dropped
/// WHY: Results from a stale turn must not corrupt the current one
#[test]
fn given_recording_when_stray_result_arrives_then_dropped() {
    // Given: A recording session
    let mut h = Harness::new(Behaviour::default());
    h.step(Signal::Intent(UserIntent::Start));
    h.transitions();

    // When: A result arrives as if from a previous session
    h.result_received(StreamResult::Audio(audio()));

    // Then: Still recording, nothing played, no transition
    assert_eq!(h.state(), SessionState::Recording);
    assert!(h.log().played.is_empty());
    assert!(h.transitions().is_empty());
}

/// WHAT: Captured audio arriving after a reset is dropped
/// WHY: A late capture signal must not push Idle into Processing
#[test]
fn given_reset_during_recording_when_audio_arrives_late_then_dropped() {
    // Given: A recording that the user resets
    let mut h = Harness::new(Behaviour::default());
    h.step(Signal::Intent(UserIntent::Start));
    h.step(Signal::Intent(UserIntent::Reset));
    assert_eq!(h.state(), SessionState::Idle);
    assert_eq!(h.log().capture_cancels, 1);
    assert_eq!(h.log().capture_stops, 0);

    // When: The capture adapter reports its audio afterwards
    h.audio_captured(audio());

    // Then: Still Idle and nothing was submitted
    assert_eq!(h.state(), SessionState::Idle);
    assert!(h.log().submitted.is_empty());
}

/// WHAT: Audio from a reset turn is dropped once a new recording has started
/// WHY: The old capture must not end the new turn or leave the record control dead
#[test]
fn given_reset_then_new_recording_when_old_audio_arrives_then_new_turn_unaffected() {
    // Given: A first recording the user stops and then resets while it encodes
    let mut h = Harness::new(Behaviour::default());
    h.step(Signal::Intent(UserIntent::Start));
    let first_turn = h.turn();
    h.step(Signal::Intent(UserIntent::Stop));
    h.step(Signal::Intent(UserIntent::Reset));
    assert_eq!(h.log().capture_cancels, 1);

    // And: A second recording is under way
    h.step(Signal::Intent(UserIntent::Start));
    let second_turn = h.turn();
    assert_ne!(first_turn, second_turn);
    assert_eq!(h.log().capture_turns, vec![first_turn, second_turn]);
    h.transitions();

    // When: The first recording's audio finally arrives
    h.step(Signal::AudioCaptured {
        turn: first_turn,
        audio: audio(),
    });

    // Then: The second recording carries on untouched
    assert_eq!(h.state(), SessionState::Recording);
    assert!(h.log().submitted.is_empty());
    assert!(h.transitions().is_empty());

    // When: The user stops the second recording normally
    h.step(Signal::Intent(UserIntent::Stop));
    h.audio_captured(audio());

    // Then: Only the second turn's audio was submitted
    assert_eq!(h.state(), SessionState::Processing);
    let submitted: Vec<u64> = h.log().submitted.iter().map(|(turn, _)| *turn).collect();
    assert_eq!(submitted, vec![second_turn]);
}

/// WHAT: A result for a reset turn is dropped while a later turn is processing
/// WHY: The backend answer to abandoned audio must not be played for new audio
#[test]
fn given_reset_during_processing_when_old_result_arrives_in_next_turn_then_dropped() {
    // Given: A turn reset while waiting on the backend
    let mut h = Harness::new(Behaviour::default());
    h.step(Signal::Intent(UserIntent::Start));
    h.audio_captured(audio());
    let first_turn = h.turn();
    h.step(Signal::Intent(UserIntent::Reset));

    // And: A second turn waiting on the backend
    h.step(Signal::Intent(UserIntent::Start));
    h.step(Signal::Intent(UserIntent::Stop));
    h.audio_captured(audio());
    assert_eq!(h.state(), SessionState::Processing);

    // When: The first turn's answer arrives
    h.step(Signal::ResultReceived {
        turn: first_turn,
        result: StreamResult::Audio(audio()),
    });

    // Then: Still processing, nothing played
    assert_eq!(h.state(), SessionState::Processing);
    assert!(h.log().played.is_empty());

    // When: The second turn's answer arrives
    h.result_received(StreamResult::Audio(audio()));

    // Then: It is played for the second turn
    assert_eq!(h.state(), SessionState::Playing);
    let played: Vec<u64> = h.log().played.iter().map(|(turn, _)| *turn).collect();
    assert_eq!(played, vec![h.turn()]);
}

/// WHAT: Playback finished for an earlier turn does not end current playback
/// WHY: A stopped speaker may still report its old audio as finished
#[test]
fn given_second_turn_playing_when_first_turn_finishes_late_then_still_playing() {
    // Given: A first turn reset mid-playback and a second turn now playing
    let mut h = Harness::new(Behaviour::default());
    h.drive_to_playing();
    let first_turn = h.turn();
    h.step(Signal::Intent(UserIntent::Reset));
    h.drive_to_playing();

    // When: The first turn reports finished
    h.step(Signal::PlaybackFinished { turn: first_turn });

    // Then: The second turn keeps playing
    assert_eq!(h.state(), SessionState::Playing);

    // When: The second turn finishes
    h.playback_finished();

    // Then: Idle
    assert_eq!(h.state(), SessionState::Idle);
}

/// WHAT: A result with no audio returns Processing to Idle
/// WHY: Backend errors are reported this way and must not strand the user
#[test]
fn given_processing_when_result_has_no_audio_then_idle() {
    // Given: A session waiting on the backend
    let mut h = Harness::new(Behaviour::default());
    h.step(Signal::Intent(UserIntent::Start));
    h.audio_captured(audio());
    assert_eq!(h.state(), SessionState::Processing);

    // When: The backend reports completion without audio
    h.result_received(StreamResult::NoAudio {
        reason: Some("speech not recognised".to_string()),
    });

    // Then: Back to Idle, nothing played
    assert_eq!(h.state(), SessionState::Idle);
    assert!(h.log().played.is_empty());
}

/// WHAT: A failed audio submit returns Processing to Idle
/// WHY: No result will ever arrive for audio that was never sent
#[test]
fn given_failing_transport_when_audio_captured_then_back_to_idle() {
    // Given: A transport that cannot accept audio
    let mut h = Harness::new(Behaviour {
        fail_submit: true,
        ..Behaviour::default()
    });
    h.step(Signal::Intent(UserIntent::Start));

    // When: Audio is captured
    h.audio_captured(audio());

    // Then: Processing was entered then left
    assert_eq!(h.state(), SessionState::Idle);
    let transitions = h.transitions();
    assert_eq!(
        transitions.last(),
        Some(&(SessionState::Processing, SessionState::Idle))
    );
}

/// WHAT: Duplicate playback-finished signals are harmless
/// WHY: Playback adapters may report "finished" more than once
#[test]
fn given_playing_when_finished_twice_then_single_transition() {
    // Given: A playing session
    let mut h = Harness::new(Behaviour::default());
    h.drive_to_playing();
    h.transitions();

    // When: Two finished signals arrive
    h.playback_finished();
    h.playback_finished();

    // Then: One transition to Idle
    assert_eq!(
        h.transitions(),
        vec![(SessionState::Playing, SessionState::Idle)]
    );
}

/// WHAT: Interrupt stops playback once, enters Interrupted, then settles to Idle
/// WHY: The UI must always return to an actionable state after an interrupt
#[tokio::test(start_paused = true)]
async fn given_playing_when_interrupt_requested_then_interrupted_then_idle_after_settle() {
    // Given: A playing session with a one second settle delay
    let mut h = Harness::new(Behaviour::default());
    h.drive_to_playing();

    // When: The user interrupts
    h.step(Signal::Intent(UserIntent::Interrupt));

    // Then: Playback stopped exactly once, state Interrupted, controls all disabled
    assert_eq!(h.log().playback_stops, 1);
    assert_eq!(h.state(), SessionState::Interrupted);
    assert!(h.coordinator.machine().is_interrupted());
    let controls = project(h.state(), Scenario::VoiceCall);
    assert!(controls.text_button.disabled);
    assert!(controls.record_button.disabled);
    assert!(controls.call_button.disabled);

    // And: The transport was told, carrying the session identifiers
    {
        let log = h.log();
        assert_eq!(log.interrupts.len(), 1);
        assert_eq!(log.interrupts[0].session_id, h.context.session_id());
        assert_eq!(log.interrupts[0].client_id, h.context.client_id());
    }

    // When: Less than the settle delay passes
    tokio::time::sleep(Duration::from_millis(500)).await;
    h.coordinator.pump();

    // Then: Still interrupted
    assert_eq!(h.state(), SessionState::Interrupted);

    // When: The settle delay elapses with no further input
    tokio::time::sleep(Duration::from_millis(600)).await;
    tokio::task::yield_now().await;
    h.coordinator.pump();

    // Then: Idle, flag cleared
    assert_eq!(h.state(), SessionState::Idle);
    assert!(!h.coordinator.machine().is_interrupted());
}

/// WHAT: A failed interrupt send does not undo the local interrupt
/// WHY: The local stop is authoritative for the UI
#[tokio::test(start_paused = true)]
async fn given_failing_transport_when_interrupting_then_still_interrupted_and_settles() {
    // Given: A playing session whose transport rejects interrupts
    let mut h = Harness::new(Behaviour {
        fail_interrupt: true,
        ..Behaviour::default()
    });
    h.drive_to_playing();

    // When: The user interrupts
    h.step(Signal::Intent(UserIntent::Interrupt));

    // Then: Interrupted despite the failure, and the send was attempted once
    assert_eq!(h.state(), SessionState::Interrupted);
    assert_eq!(h.log().interrupts.len(), 1);

    // When: The settle delay elapses
    tokio::time::sleep(Duration::from_millis(1100)).await;
    tokio::task::yield_now().await;
    h.coordinator.pump();

    // Then: Idle
    assert_eq!(h.state(), SessionState::Idle);
}

/// WHAT: Interrupt outside Playing is a silent no-op
/// WHY: Users press the call button speculatively
#[test]
fn given_processing_when_interrupt_requested_then_ignored() {
    // Given: A session waiting on the backend
    let mut h = Harness::new(Behaviour::default());
    h.step(Signal::Intent(UserIntent::Start));
    h.audio_captured(audio());

    // When: Interrupt is requested
    h.step(Signal::Intent(UserIntent::Interrupt));

    // Then: Nothing stopped, nothing sent, still processing
    assert_eq!(h.state(), SessionState::Processing);
    assert_eq!(h.log().playback_stops, 0);
    assert!(h.log().interrupts.is_empty());
}

/// WHAT: Playback finishing after an interrupt does not skip the settle
/// WHY: A stopped adapter may still report finished
#[tokio::test(start_paused = true)]
async fn given_interrupted_when_playback_finished_arrives_then_still_interrupted() {
    // Given: An interrupted session
    let mut h = Harness::new(Behaviour::default());
    h.drive_to_playing();
    h.step(Signal::Intent(UserIntent::Interrupt));

    // When: A late finished signal arrives
    h.playback_finished();

    // Then: Still interrupted
    assert_eq!(h.state(), SessionState::Interrupted);
}

/// WHAT: Zero settle delay returns to Idle on the next pump
/// WHY: Headless sessions may disable the confirmation delay
#[tokio::test]
async fn given_zero_settle_delay_when_interrupting_then_idle_immediately() {
    // Given: A playing session with no settle delay
    let mut h = Harness::new(Behaviour {
        settle_delay_ms: 0,
        ..Behaviour::default()
    });
    h.drive_to_playing();
    h.transitions();

    // When: Interrupting
    h.step(Signal::Intent(UserIntent::Interrupt));

    // Then: Interrupted was committed and immediately settled
    assert_eq!(h.state(), SessionState::Idle);
    assert_eq!(
        h.transitions(),
        vec![
            (SessionState::Playing, SessionState::Interrupted),
            (SessionState::Interrupted, SessionState::Idle),
        ]
    );
}

/// WHAT: Interrupting outside an async runtime settles at once
/// WHY: With no timer available the session must not stay Interrupted
#[test]
fn given_no_runtime_when_interrupting_then_settles_immediately() {
    // Given: A playing session with a non-zero settle delay and no runtime
    let mut h = Harness::new(Behaviour::default());
    h.drive_to_playing();
    h.transitions();

    // When: Interrupting
    h.step(Signal::Intent(UserIntent::Interrupt));

    // Then: Interrupted was shown and then settled
    assert_eq!(h.state(), SessionState::Idle);
    assert_eq!(
        h.transitions(),
        vec![
            (SessionState::Playing, SessionState::Interrupted),
            (SessionState::Interrupted, SessionState::Idle),
        ]
    );
}

/// WHAT: Reset from Playing stops playback and returns to Idle
/// WHY: Reset must leave no adapter running
#[test]
fn given_playing_when_reset_then_playback_stopped_and_idle() {
    // Given: A playing session
    let mut h = Harness::new(Behaviour::default());
    h.drive_to_playing();

    // When: Reset
    h.step(Signal::Intent(UserIntent::Reset));

    // Then: Idle with playback stopped
    assert_eq!(h.state(), SessionState::Idle);
    assert_eq!(h.log().playback_stops, 1);
}

/// WHAT: The run loop drives transitions from bus signals and stops on shutdown
/// WHY: In production the coordinator is fed only through the bus
#[tokio::test(start_paused = true)]
#[allow(clippy::unwrap_used)]
async fn given_running_coordinator_when_signals_published_then_state_changes_observed() {
    // Given: A coordinator running on its own task
    let Harness {
        context,
        coordinator,
        mut events,
        ..
    } = Harness::new(Behaviour::default());
    let reader = coordinator.state_reader();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(coordinator.run(shutdown_rx));

    // When: A full turn ending in an interrupt is published
    let bus = context.bus();
    bus.publish(Signal::Intent(UserIntent::Start));
    assert_eq!(next_state(&mut events).await, SessionState::Recording);
    bus.publish(Signal::AudioCaptured {
        turn: 1,
        audio: audio(),
    });
    assert_eq!(next_state(&mut events).await, SessionState::Processing);
    bus.publish(Signal::ResultReceived {
        turn: 1,
        result: StreamResult::Audio(audio()),
    });
    assert_eq!(next_state(&mut events).await, SessionState::Playing);
    bus.publish(Signal::Intent(UserIntent::Interrupt));
    assert_eq!(next_state(&mut events).await, SessionState::Interrupted);

    // Then: Without further input the session settles to Idle
    assert_eq!(next_state(&mut events).await, SessionState::Idle);
    assert_eq!(*reader.borrow(), SessionState::Idle);

    // When: Shutdown is requested
    shutdown_tx.send(true).unwrap();

    // Then: The loop exits and leaves the bus
    handle.await.unwrap();
    assert_eq!(context.bus().subscriber_count(), 1);
}
