//! Chat stream decoding.
//!
//! The response body of `POST /rag/chat/stream` is a sequence of frames
//! separated by a blank line, each carrying one `data: <payload>` line.
//! `<payload>` is either `[DONE]` or a JSON object with a `type` field.
//!
//! # Module structure
//! - `frame` - bytes to frames ([`FrameDecoder`], [`frames`])
//! - `parser` - frame to event ([`parse_frame`])
//! - `events` - the [`StreamEvent`] type
//! - `payloads` - internal payload deserialization structs

mod events;
mod frame;
mod parser;
mod payloads;

pub use events::StreamEvent;
pub use frame::{frames, FrameDecoder, FRAME_DELIMITER};
pub use parser::{
    classify, extract_payload, parse_frame, parse_payload, CITATIONS_KIND, DATA_PREFIX,
    DONE_SENTINEL, ERROR_KIND,
};
