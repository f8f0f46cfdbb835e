//! Lifecycle of a chat turn and the notifications it emits.

use crate::models::{Citation, Message};

/// State of the session's current turn.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No turn started yet
    #[default]
    Idle,
    /// Reading the response stream
    Streaming,
    /// Stream finished with `[DONE]` or a clean end of body
    Completed,
    /// Stopped by the user
    Cancelled,
    /// Transport failure; the reason is also the assistant text
    Failed(String),
}

impl SessionState {
    pub fn is_streaming(&self) -> bool {
        matches!(self, SessionState::Streaming)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Completed | SessionState::Cancelled | SessionState::Failed(_)
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Streaming => "streaming",
            SessionState::Completed => "completed",
            SessionState::Cancelled => "cancelled",
            SessionState::Failed(_) => "failed",
        }
    }
}

/// Change notifications for a presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnUpdate {
    /// A question was accepted and its placeholder appended
    Started { turn: u64 },
    /// Sources for the turn arrived
    Citations { turn: u64, citations: Vec<Citation> },
    /// Text was appended to the answer
    Delta { turn: u64, delta: String },
    /// The turn reached a terminal state
    Finished { turn: u64, state: SessionState },
}

impl TurnUpdate {
    pub fn turn(&self) -> u64 {
        match self {
            TurnUpdate::Started { turn }
            | TurnUpdate::Citations { turn, .. }
            | TurnUpdate::Delta { turn, .. }
            | TurnUpdate::Finished { turn, .. } => *turn,
        }
    }
}

/// Point-in-time copy of everything a view needs.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub messages: Vec<Message>,
    pub citations: Vec<Citation>,
    pub state: SessionState,
}

impl SessionSnapshot {
    /// Text of the newest assistant message.
    pub fn answer(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.is_assistant())
            .map(|m| m.text.as_str())
    }
}
