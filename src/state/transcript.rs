//! The ordered conversation shown to the user.

use crate::models::Message;

/// Append-only list of messages.
///
/// Messages are never removed. After a turn begins, only the text of the
/// trailing assistant message may change, and only through the crate's own
/// session code.
#[derive(Debug, Clone, Default)]
pub struct TranscriptStore {
    messages: Vec<Message>,
}

impl TranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Append a user question and an empty assistant placeholder.
    pub(crate) fn begin_turn(&mut self, question: impl Into<String>) {
        self.messages.push(Message::user(question));
        self.messages.push(Message::assistant_placeholder());
    }

    /// Move the tail text out, leaving it empty until it is put back.
    pub(crate) fn take_tail_text(&mut self) -> String {
        self.tail_mut()
            .map(|m| std::mem::take(&mut m.text))
            .unwrap_or_default()
    }

    /// Overwrite the tail text.
    pub(crate) fn replace_tail_text(&mut self, text: String) {
        if let Some(tail) = self.tail_mut() {
            tail.text = text;
        }
    }

    fn tail_mut(&mut self) -> Option<&mut Message> {
        self.messages.last_mut().filter(|m| m.is_assistant())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MessageRole;

    #[test]
    fn test_begin_turn_appends_pair() {
        let mut transcript = TranscriptStore::new();
        transcript.begin_turn("first?");
        transcript.begin_turn("second?");

        let roles: Vec<_> = transcript.messages().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                MessageRole::User,
                MessageRole::Assistant,
                MessageRole::User,
                MessageRole::Assistant
            ]
        );
        assert_eq!(transcript.messages()[2].text, "second?");
        assert_eq!(transcript.last().unwrap().text, "");
    }

    #[test]
    fn test_only_tail_changes() {
        let mut transcript = TranscriptStore::new();
        transcript.begin_turn("q1");
        transcript.replace_tail_text("a1".to_string());
        transcript.begin_turn("q2");
        transcript.replace_tail_text("a2".to_string());

        let texts: Vec<_> = transcript.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["q1", "a1", "q2", "a2"]);
        assert_eq!(transcript.len(), 4);
    }

    #[test]
    fn test_take_and_replace_tail() {
        let mut transcript = TranscriptStore::new();
        transcript.begin_turn("q");
        transcript.replace_tail_text("partial".to_string());

        let mut text = transcript.take_tail_text();
        text.push_str(" answer");
        transcript.replace_tail_text(text);
        assert_eq!(transcript.last().unwrap().text, "partial answer");
    }

    #[test]
    fn test_no_tail_without_turn() {
        let mut transcript = TranscriptStore::new();
        assert_eq!(transcript.take_tail_text(), "");
        transcript.replace_tail_text("ignored".to_string());
        assert!(transcript.is_empty());
    }
}
