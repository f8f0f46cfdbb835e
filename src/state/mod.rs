//! Conversation state and the pure logic that updates it.

mod reducer;
mod session_state;
mod transcript;

pub use reducer::{reduce, Control, TurnState};
pub use session_state::{SessionSnapshot, SessionState, TurnUpdate};
pub use transcript::TranscriptStore;
