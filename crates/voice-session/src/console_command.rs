use voice_session_core::{Control, Scenario};

/// A line typed on the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Press a control.
    Click(Control),
    /// Abandon the current turn.
    Reset,
    /// Switch the presented scenario.
    Scenario(Scenario),
    /// Print the mirrored session state.
    Status,
    /// Print the command list.
    Help,
    /// Leave the application.
    Quit,
}

/// Command list shown by `help`.
pub const HELP: &str = "commands: text | record | call | reset | \
                        scenario <text_chat|voice_recording|voice_call> | status | help | quit";

impl ConsoleCommand {
    /// Parse one input line. Blank lines yield `None`; anything unknown is an error.
    pub fn parse(line: &str) -> Option<Result<Self, String>> {
        let mut words = line.split_whitespace();
        let command = words.next()?.to_ascii_lowercase();

        let parsed = match command.as_str() {
            "text" | "t" => Ok(ConsoleCommand::Click(Control::Text)),
            "record" | "r" => Ok(ConsoleCommand::Click(Control::Record)),
            "call" | "c" => Ok(ConsoleCommand::Click(Control::Call)),
            "reset" => Ok(ConsoleCommand::Reset),
            "status" | "s" => Ok(ConsoleCommand::Status),
            "help" | "?" => Ok(ConsoleCommand::Help),
            "quit" | "exit" | "q" => Ok(ConsoleCommand::Quit),
            "scenario" => match words.next().and_then(Scenario::from_name) {
                Some(scenario) => Ok(ConsoleCommand::Scenario(scenario)),
                None => Err("usage: scenario <text_chat|voice_recording|voice_call>".to_string()),
            },
            other => Err(format!("unknown command '{}'", other)),
        };

        Some(parsed)
    }
}
