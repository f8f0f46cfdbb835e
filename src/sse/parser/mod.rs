//! Turning a frame into a [`StreamEvent`].
//!
//! Parsing never fails. A frame without a payload line, or with a payload
//! that is not JSON, yields no event; a JSON payload of unknown shape yields
//! [`StreamEvent::Unrecognized`].

mod citations;

use crate::sse::events::StreamEvent;
use crate::sse::payloads::EventEnvelope;

use citations::parse_citations;

/// Marker that starts the payload line of a frame.
pub const DATA_PREFIX: &str = "data:";

/// Payload that ends the stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Discriminant of the citations event.
pub const CITATIONS_KIND: &str = "citations";

/// Discriminant of an in-band backend failure.
pub const ERROR_KIND: &str = "error";

/// Return the payload of the first `data:` line in `frame`.
pub fn extract_payload(frame: &str) -> Option<&str> {
    frame
        .lines()
        .find_map(|line| line.strip_prefix(DATA_PREFIX))
        .map(str::trim)
}

/// Parse one frame. `None` means the frame carries no event.
pub fn parse_frame(frame: &str) -> Option<StreamEvent> {
    match extract_payload(frame) {
        Some(payload) => parse_payload(payload),
        None => {
            tracing::debug!("Skipping frame without payload line");
            None
        }
    }
}

/// Parse the text after `data:`.
pub fn parse_payload(payload: &str) -> Option<StreamEvent> {
    if payload == DONE_SENTINEL {
        return Some(StreamEvent::Done);
    }

    match serde_json::from_str::<serde_json::Value>(payload) {
        Ok(value) => Some(classify(value)),
        Err(e) => {
            tracing::debug!("Skipping unparsable payload: {}", e);
            None
        }
    }
}

/// Classify a decoded payload by its `type` field.
///
/// Anything not positively identified as citations or a text fragment
/// becomes `Unrecognized`.
pub fn classify(value: serde_json::Value) -> StreamEvent {
    let envelope: EventEnvelope = match serde_json::from_value(value) {
        Ok(envelope) => envelope,
        Err(_) => return StreamEvent::Unrecognized { kind: None },
    };
    let kind = envelope.kind.as_deref();

    if kind == Some(CITATIONS_KIND) {
        return StreamEvent::Citations {
            citations: parse_citations(envelope.citations.as_ref()),
        };
    }

    if kind == Some(ERROR_KIND) {
        tracing::warn!(
            "Backend reported an error in stream: {}",
            envelope.error_message().unwrap_or("(no message)")
        );
        return StreamEvent::Unrecognized {
            kind: envelope.kind,
        };
    }

    let delta = if kind.is_some_and(carries_full_text) {
        envelope.delta()
    } else {
        envelope.delta_text()
    };
    if let Some(delta) = delta {
        return StreamEvent::TextDelta {
            delta: delta.to_string(),
        };
    }

    StreamEvent::Unrecognized {
        kind: envelope.kind,
    }
}

/// Completion events such as `response.output_text.done` repeat the whole
/// answer under `text`, so only their `delta` is taken.
fn carries_full_text(kind: &str) -> bool {
    kind.ends_with(".done") || kind.ends_with(".completed")
}
