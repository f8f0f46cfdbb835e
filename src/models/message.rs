use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One entry of the visible conversation.
///
/// Only the text of the newest assistant message changes after it has been
/// appended; see [`TranscriptStore`](crate::state::TranscriptStore).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Role of the message sender
    pub role: MessageRole,
    /// Text content, grown delta by delta for an in-flight assistant turn
    pub text: String,
    /// When the message was appended
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// A user question.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    /// An empty assistant message, filled in as the answer streams.
    pub fn assistant_placeholder() -> Self {
        Self {
            role: MessageRole::Assistant,
            text: String::new(),
            created_at: Utc::now(),
        }
    }

    pub fn is_assistant(&self) -> bool {
        self.role == MessageRole::Assistant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let user = Message::user("What is on page 2?");
        assert_eq!(user.role, MessageRole::User);
        assert_eq!(user.text, "What is on page 2?");
        assert!(!user.is_assistant());

        let assistant = Message::assistant_placeholder();
        assert!(assistant.is_assistant());
        assert!(assistant.text.is_empty());
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(
            serde_json::to_string(&MessageRole::Assistant).unwrap(),
            "\"assistant\""
        );
        let role: MessageRole = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, MessageRole::User);
    }
}
