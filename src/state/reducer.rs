//! Folding stream events into the state of one turn.

use crate::models::Citation;
use crate::sse::StreamEvent;

/// What the in-flight turn has accumulated so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnState {
    pub assistant_text: String,
    pub citations: Vec<Citation>,
}

impl TurnState {
    pub fn new(assistant_text: impl Into<String>, citations: Vec<Citation>) -> Self {
        Self {
            assistant_text: assistant_text.into(),
            citations,
        }
    }
}

/// Whether the consumer keeps reading after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Stop,
}

/// Apply `event` to `state`.
///
/// Pure: the result depends only on the arguments. Citations are replaced
/// wholesale, deltas are appended verbatim, `Done` stops the stream, and
/// anything else is a no-op.
pub fn reduce(state: TurnState, event: StreamEvent) -> (TurnState, Control) {
    match event {
        StreamEvent::Citations { citations } => (
            TurnState {
                citations,
                ..state
            },
            Control::Continue,
        ),
        StreamEvent::TextDelta { delta } => {
            let mut state = state;
            state.assistant_text.push_str(&delta);
            (state, Control::Continue)
        }
        StreamEvent::Done => (state, Control::Stop),
        StreamEvent::Unrecognized { .. } => (state, Control::Continue),
    }
}
