//! SSE payload deserialization structs
//!
//! The backend forwards raw model events next to its own `citations` event,
//! so every field is optional and typed loosely.

use serde::Deserialize;

/// Top-level fields the classifier looks at.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct EventEnvelope {
    /// Discriminant, e.g. `citations` or `response.output_text.delta`
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Citation list, present on the `citations` event
    #[serde(default)]
    pub citations: Option<serde_json::Value>,
    /// Text fragment (Responses API)
    #[serde(default)]
    pub delta: Option<serde_json::Value>,
    /// Text fragment under the alternate name
    #[serde(default)]
    pub text: Option<serde_json::Value>,
    /// Human-readable message of an in-band `error` event
    #[serde(default)]
    pub message: Option<serde_json::Value>,
}

impl EventEnvelope {
    /// `delta` if it is a non-empty string, otherwise `text`.
    pub fn delta_text(&self) -> Option<&str> {
        self.delta().or_else(|| non_empty_str(self.text.as_ref()))
    }

    /// `delta` alone, without the `text` fallback.
    pub fn delta(&self) -> Option<&str> {
        non_empty_str(self.delta.as_ref())
    }

    pub fn error_message(&self) -> Option<&str> {
        self.message.as_ref().and_then(|m| m.as_str())
    }
}

fn non_empty_str(value: Option<&serde_json::Value>) -> Option<&str> {
    value
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
}
