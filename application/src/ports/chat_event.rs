//! Chat events emitted for presentation layer rendering
//!
//! These events form the output port from the application layer to whatever
//! renders the chat (the console front end in this workspace).

use screening_domain::{ChatTurn, ConnectionStatus, ScreeningOutcome, User};

/// UI-visible change of a chat session
#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    /// A completed turn was appended to the history
    TurnAppended(ChatTurn),
    /// Connection status changed
    StatusChanged(ConnectionStatus),
    /// A bot reply started or stopped streaming
    StreamingChanged(bool),
    /// The server assigned the conversation id
    ConversationAssigned(String),
    /// An error to show next to the chat
    Error(String),
    /// The server ended the conversation
    ConversationEnded,
    /// Fresh profile fetched during the result hand-off
    ProfileRefreshed(User),
    /// The screening outcome was handed to the results view
    OutcomeHandedOff(ScreeningOutcome),
}
