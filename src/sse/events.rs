//! Typed events decoded from stream frames.

use crate::models::Citation;

/// One decoded frame of the chat stream.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Sources for the current turn, sent before the answer
    Citations { citations: Vec<Citation> },
    /// Next fragment of the answer
    TextDelta { delta: String },
    /// End-of-stream sentinel
    Done,
    /// Well-formed payload with nothing to act on
    Unrecognized { kind: Option<String> },
}

impl StreamEvent {
    /// Returns the event type name as a string for debugging purposes.
    pub fn event_type_name(&self) -> &'static str {
        match self {
            StreamEvent::Citations { .. } => "citations",
            StreamEvent::TextDelta { .. } => "text_delta",
            StreamEvent::Done => "done",
            StreamEvent::Unrecognized { .. } => "unrecognized",
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, StreamEvent::Done)
    }
}
