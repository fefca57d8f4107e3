use crate::{AppResult, ConsoleCommand, ConsoleSurface, HELP};

use std::io::Write;

use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    sync::watch,
};
use tracing::{debug, info, instrument};
use voice_session_core::{
    ControlBinder, SessionContext, Signal, StateChangeEvent, Subscription, UserIntent,
};

/// Console front end of one voice session.
///
/// Owns the control binder: renders every state change it sees on the bus
/// and turns typed commands into control presses. The coordinator runs on
/// its own task and is only reached through the bus.
pub struct App<W: Write> {
    pub(crate) context: SessionContext,
    pub(crate) binder: ControlBinder<ConsoleSurface<W>>,
    pub(crate) events: Subscription,
    pub(crate) mirror_rx: watch::Receiver<Option<StateChangeEvent>>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
}

impl<W: Write> App<W> {
    /// Run until `quit` or end of input, then signal shutdown.
    #[instrument(skip_all)]
    pub(crate) async fn run<R>(mut self, input: R) -> AppResult<()>
    where
        R: AsyncBufRead + Unpin,
    {
        info!(session_id = %self.context.session_id(), "Voice session console starting");
        println!("{}", HELP);

        let mut lines = input.lines();

        loop {
            tokio::select! {
                line = lines.next_line() => match line? {
                    Some(line) => {
                        if !self.handle_line(&line) {
                            info!("Quit requested");
                            break;
                        }
                    }
                    None => {
                        info!("Console input closed");
                        break;
                    }
                },

                Some(signal) = self.events.recv() => self.binder.on_signal(&signal),
            }
        }

        self.context.bus().unsubscribe(self.events.id());
        if self.shutdown_tx.send(true).is_err() {
            debug!("No background task left to notify of shutdown");
        }
        info!("Voice session console shut down");

        Ok(())
    }

    /// Apply one typed line. Returns `false` when the user asked to quit.
    pub(crate) fn handle_line(&mut self, line: &str) -> bool {
        match ConsoleCommand::parse(line) {
            None => true,
            Some(Err(message)) => {
                println!("{}", message);
                println!("{}", HELP);
                true
            }
            Some(Ok(command)) => self.handle_command(command),
        }
    }

    fn handle_command(&mut self, command: ConsoleCommand) -> bool {
        match command {
            ConsoleCommand::Click(control) => {
                if self.binder.click(control).is_none() {
                    println!("{:?} does nothing right now", control);
                }
            }
            ConsoleCommand::Reset => {
                self.context
                    .bus()
                    .publish(Signal::Intent(UserIntent::Reset));
            }
            ConsoleCommand::Scenario(scenario) => self.binder.set_scenario(scenario),
            ConsoleCommand::Status => println!("{}", self.status()),
            ConsoleCommand::Help => println!("{}", HELP),
            ConsoleCommand::Quit => return false,
        }

        true
    }

    /// One-line summary from the mirrored state.
    pub(crate) fn status(&self) -> String {
        match *self.mirror_rx.borrow() {
            Some(event) => format!(
                "state: {} (from {}), scenario: {:?}",
                event.next,
                event.previous,
                self.binder.scenario()
            ),
            None => format!("state: idle, scenario: {:?}", self.binder.scenario()),
        }
    }
}
