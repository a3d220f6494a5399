//! Presentation layer for screening-client
//!
//! This crate contains CLI definitions, console formatting,
//! and the interactive chat front end.

pub mod chat;
pub mod cli;
pub mod output;

// Re-export commonly used types
pub use chat::{ChatConsole, ChatRenderer};
pub use cli::commands::{ChatArgs, Cli, Command, SignupArgs};
pub use output::console::ConsoleFormatter;
