//! Interactive chat module
//!
//! Line-based console front end for a screening conversation: typed lines
//! become [`ChatCommand`]s, [`ChatEvent`]s are rendered as they arrive.

mod input;
mod renderer;

pub use input::{InputAction, help_text, parse_input, spawn_line_reader};
pub use renderer::ChatRenderer;

use crate::ConsoleFormatter;
use colored::Colorize;
use screening_application::{
    ChatCommand, ChatConnector, ChatEvent, ChatRunOutput, RunChatError, RunChatInput,
    RunChatUseCase, ScreeningApi,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Console chat driver
pub struct ChatConsole<C: ChatConnector + 'static, A: ScreeningApi + 'static> {
    use_case: RunChatUseCase<C, A>,
    quiet: bool,
}

impl<C: ChatConnector + 'static, A: ScreeningApi + 'static> ChatConsole<C, A> {
    pub fn new(use_case: RunChatUseCase<C, A>) -> Self {
        Self {
            use_case,
            quiet: false,
        }
    }

    /// Hide banners, status lines and the typing spinner
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Chat on the terminal until the user leaves or the connection gives up.
    pub async fn run(&self, input: RunChatInput) -> Result<ChatRunOutput, RunChatError> {
        if !self.quiet {
            self.print_welcome();
        }

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        // Detached: the thread ends on the next line once the receiver is gone.
        let _reader = spawn_line_reader(command_tx);

        self.run_with(input, command_rx).await
    }

    /// Same as [`run`](Self::run) with commands from any source.
    pub async fn run_with(
        &self,
        input: RunChatInput,
        commands: mpsc::UnboundedReceiver<ChatCommand>,
    ) -> Result<ChatRunOutput, RunChatError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let render_task = spawn_renderer(rx, self.quiet);

        let result = self.use_case.execute(input, commands, tx).await;

        // All senders are gone once execute returns; the renderer drains and stops.
        let _ = render_task.await;
        result
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", ConsoleFormatter::header("Screening Chat"));
        println!();
        println!(
            "Answer the agent's questions. Type {} for commands, {} to leave.",
            "/help".cyan(),
            "/quit".cyan()
        );
        println!();
    }
}

fn spawn_renderer(mut rx: mpsc::UnboundedReceiver<ChatEvent>, quiet: bool) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut renderer = ChatRenderer::new(quiet);
        while let Some(event) = rx.recv().await {
            renderer.render(&event);
        }
        renderer.finish();
    })
}
