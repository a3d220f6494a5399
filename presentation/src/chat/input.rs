//! Line input for the console chat.
//!
//! Lines are read through a `rustyline` editor on a plain OS thread: a
//! blocking read parked inside the runtime would keep it from shutting down
//! after the chat ends.

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use screening_application::ChatCommand;
use std::thread::JoinHandle;
use tokio::sync::mpsc;

const PROMPT: &str = "> ";

/// What one typed line asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    Command(ChatCommand),
    Help,
    Unknown(String),
    Nothing,
}

/// Interpret one line of user input.
///
/// Anything that is not a slash command is a chat message.
pub fn parse_input(line: &str) -> InputAction {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return InputAction::Nothing;
    }
    if !trimmed.starts_with('/') {
        return InputAction::Command(ChatCommand::Send(trimmed.to_string()));
    }

    match trimmed.split_whitespace().next().unwrap_or(trimmed) {
        "/end" => InputAction::Command(ChatCommand::End),
        "/quit" | "/exit" | "/q" => InputAction::Command(ChatCommand::Quit),
        "/help" | "/h" | "/?" => InputAction::Help,
        other => InputAction::Unknown(other.to_string()),
    }
}

pub fn help_text() -> &'static str {
    "Commands:\n  \
     /end    Ask the agent to pause the conversation\n  \
     /quit   Leave the chat\n  \
     /help   Show this help\n\
     Anything else is sent as your answer."
}

/// Read lines until EOF or until the chat stops listening.
///
/// EOF and Ctrl-C both count as `/quit`.
pub fn spawn_line_reader(commands: mpsc::UnboundedSender<ChatCommand>) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(err) => {
                eprintln!("Error: cannot read input: {}", err);
                let _ = commands.send(ChatCommand::Quit);
                return;
            }
        };

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    let action = parse_input(&line);
                    if matches!(action, InputAction::Command(ChatCommand::Send(_))) {
                        let _ = rl.add_history_entry(line.trim());
                    }
                    if !dispatch(action, &commands) {
                        return;
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }
        let _ = commands.send(ChatCommand::Quit);
    })
}

/// Act on one parsed line. Returns `false` once the chat stopped listening.
fn dispatch(action: InputAction, commands: &mpsc::UnboundedSender<ChatCommand>) -> bool {
    match action {
        InputAction::Command(command) => {
            if commands.send(command).is_err() {
                return false;
            }
        }
        InputAction::Help => println!("{}", help_text()),
        InputAction::Unknown(command) => {
            println!("Unknown command: {} (try /help)", command)
        }
        InputAction::Nothing => {}
    }
    !commands.is_closed()
}
