//! Renders chat events to the terminal

use crate::ConsoleFormatter;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use screening_application::ChatEvent;
use screening_domain::ConnectionStatus;
use std::time::Duration;

/// Turns [`ChatEvent`]s into console output, with a spinner while the
/// agent is typing.
pub struct ChatRenderer {
    quiet: bool,
    spinner: Option<ProgressBar>,
}

impl ChatRenderer {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            spinner: None,
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg:.dimmed}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    pub fn render(&mut self, event: &ChatEvent) {
        match event {
            ChatEvent::StreamingChanged(true) => self.start_spinner(),
            ChatEvent::StreamingChanged(false) => self.stop_spinner(),
            _ => {
                if let Some(text) = self.describe(event) {
                    self.print(&text);
                }
            }
        }
    }

    /// Text printed for an event, if any.
    ///
    /// User turns are not echoed; the terminal already shows what was typed.
    pub fn describe(&self, event: &ChatEvent) -> Option<String> {
        match event {
            ChatEvent::TurnAppended(turn) if turn.is_user_authored() => None,
            ChatEvent::TurnAppended(turn) => Some(ConsoleFormatter::format_turn(turn)),
            ChatEvent::StatusChanged(status) => match status {
                ConnectionStatus::Errored => Some(ConsoleFormatter::format_status(*status)),
                _ if self.quiet => None,
                _ => Some(ConsoleFormatter::format_status(*status)),
            },
            ChatEvent::ConversationAssigned(id) if !self.quiet => {
                Some(format!("Conversation {} started", id).dimmed().to_string())
            }
            ChatEvent::Error(message) => Some(ConsoleFormatter::format_error(message)),
            ChatEvent::ConversationEnded => Some(format!(
                "{} Type {} to leave.",
                "Conversation ended.".yellow().bold(),
                "/quit".cyan()
            )),
            ChatEvent::OutcomeHandedOff(outcome) => {
                Some(ConsoleFormatter::format_outcome(outcome))
            }
            _ => None,
        }
    }

    fn start_spinner(&mut self) {
        if self.quiet || self.spinner.is_some() {
            return;
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_message("Agent is typing...");
        pb.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(pb);
    }

    fn stop_spinner(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }

    fn print(&self, text: &str) {
        match &self.spinner {
            Some(pb) => pb.suspend(|| println!("{}", text)),
            None => println!("{}", text),
        }
    }

    /// Clear any spinner left behind when the chat stops mid-reply.
    pub fn finish(&mut self) {
        self.stop_spinner();
    }
}
