use crate::{
    Control, ControlAffordances, Scenario, SessionContext, SessionState, Signal, UserIntent,
    project,
};

use tokio::sync::watch;
use tracing::{debug, instrument};

/// Whatever physically draws the controls.
pub trait ControlSurface {
    /// Draw the full affordance triple.
    fn render(&mut self, affordances: &ControlAffordances);
}

/// Map a press on `control` to a user intent.
///
/// The text control never produces a voice intent; typed messages travel
/// outside the voice session.
pub fn intent_for(control: Control, state: SessionState, scenario: Scenario) -> Option<UserIntent> {
    match (control, state) {
        (Control::Record, SessionState::Idle) => Some(UserIntent::Start),
        (Control::Record, SessionState::Recording) => Some(UserIntent::Stop),
        (Control::Call, SessionState::Playing) => Some(UserIntent::Interrupt),
        (Control::Call, SessionState::Idle) if scenario == Scenario::VoiceCall => {
            Some(UserIntent::Start)
        }
        _ => None,
    }
}

/// Binds physical controls to the session.
///
/// Consumes `StateChanged` signals and renders the projection; turns
/// presses into intents on the bus. It never touches session state.
pub struct ControlBinder<S> {
    context: SessionContext,
    scenario: Scenario,
    state: SessionState,
    rendered: ControlAffordances,
    surface: S,
}

impl<S: ControlSurface> ControlBinder<S> {
    /// Create a binder and render the current state once.
    pub fn new(
        context: SessionContext,
        scenario: Scenario,
        state_reader: &watch::Receiver<SessionState>,
        mut surface: S,
    ) -> Self {
        let state = *state_reader.borrow();
        let rendered = project(state, scenario);
        surface.render(&rendered);

        Self {
            context,
            scenario,
            state,
            rendered,
            surface,
        }
    }

    /// Active scenario.
    pub fn scenario(&self) -> Scenario {
        self.scenario
    }

    /// Last state seen.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// What is currently drawn.
    pub fn rendered(&self) -> &ControlAffordances {
        &self.rendered
    }

    /// The surface being drawn on.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Switch scenario and redraw.
    pub fn set_scenario(&mut self, scenario: Scenario) {
        self.scenario = scenario;
        self.render();
    }

    /// Redraw on state changes; other signals are ignored.
    pub fn on_signal(&mut self, signal: &Signal) {
        if let Signal::StateChanged(event) = signal {
            self.state = event.next;
            self.render();
        }
    }

    /// Press `control`. Publishes and returns the resulting intent, if any.
    #[instrument(skip(self))]
    pub fn click(&mut self, control: Control) -> Option<UserIntent> {
        if self.rendered.get(control).disabled {
            debug!(state = %self.state, "Press on disabled control ignored");
            return None;
        }

        let intent = intent_for(control, self.state, self.scenario)?;
        self.context.bus().publish(Signal::Intent(intent));

        debug!(?intent, "Intent published");

        Some(intent)
    }

    fn render(&mut self) {
        self.rendered = project(self.state, self.scenario);
        self.surface.render(&self.rendered);
    }
}
