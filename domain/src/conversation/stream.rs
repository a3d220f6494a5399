//! Stream buffer and turn assembly.
//!
//! Reply fragments are invisible until a turn boundary arrives, so a partial
//! reply is never saved as a turn. [`TurnAssembler::apply`] is the single
//! entry point for server frames; it reports what changed as an
//! [`AssemblyEffect`] and leaves session bookkeeping to the caller.
//!
//! | Frame | Buffer | Turns emitted | Streaming |
//! |-------|--------|---------------|-----------|
//! | `greeting` / `message` | append fragment | none | unchanged |
//! | `status_update` | flush, clear | 0 or 1 bot turn | off |
//! | `conversation_end` | flush, clear | buffer turn, then closing turn | off |
//! | `error` | discard | none | off |

use super::entities::ChatTurn;
use crate::core::id::IdGenerator;
use crate::protocol::frame::{CompletionNotice, ServerFrame};

/// What applying one frame changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyEffect {
    /// Completed turns, in the order they must be appended
    pub turns: Vec<ChatTurn>,
    /// `Some(false)` when the frame ended the streamed reply
    pub streaming: Option<bool>,
    /// Error text of an `error` frame
    pub error: Option<String>,
    /// Decision metadata of a completing `status_update`
    pub completion: Option<CompletionNotice>,
    /// The conversation is over for turn-taking purposes
    pub conversation_ended: bool,
}

/// Accumulates the in-progress bot reply (one per session)
#[derive(Debug, Default)]
pub struct TurnAssembler {
    buffer: String,
    ids: IdGenerator,
}

impl TurnAssembler {
    pub fn new(ids: IdGenerator) -> Self {
        Self {
            buffer: String::new(),
            ids,
        }
    }

    /// Text received so far for the reply in progress
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Drop any partial reply (a new user turn starts a fresh reply)
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    pub fn apply(&mut self, frame: &ServerFrame) -> AssemblyEffect {
        match frame {
            ServerFrame::Greeting { .. } | ServerFrame::Message { .. } => {
                if let Some(fragment) = frame.fragment() {
                    self.buffer.push_str(fragment);
                }
                AssemblyEffect::default()
            }
            ServerFrame::StatusUpdate { .. } => AssemblyEffect {
                turns: self.flush().into_iter().collect(),
                streaming: Some(false),
                completion: frame.completion(),
                ..Default::default()
            },
            ServerFrame::ConversationEnd { message, .. } => {
                let mut turns: Vec<ChatTurn> = self.flush().into_iter().collect();
                if let Some(text) = message.as_deref().filter(|t| !t.is_empty()) {
                    turns.push(ChatTurn::closing(&self.ids, text));
                }
                AssemblyEffect {
                    turns,
                    streaming: Some(false),
                    conversation_ended: true,
                    ..Default::default()
                }
            }
            ServerFrame::Error { .. } => {
                self.reset();
                AssemblyEffect {
                    streaming: Some(false),
                    error: frame.error_message().map(str::to_string),
                    ..Default::default()
                }
            }
        }
    }

    fn flush(&mut self) -> Option<ChatTurn> {
        if self.buffer.is_empty() {
            return None;
        }
        let text = std::mem::take(&mut self.buffer);
        Some(ChatTurn::bot(&self.ids, text))
    }
}
