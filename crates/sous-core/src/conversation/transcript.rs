//! Conversation transcript.

use serde::{Deserialize, Serialize};

use super::message::{ChatMessage, ChatRole};
use crate::error::SousError;

/// Ordered, append-only message history.
///
/// A transcript is seeded with a greeting and is therefore never empty. The
/// only in-place mutation allowed is on the final element, and only while it
/// is an assistant message; the owning session decides when that is legal
/// through its pending flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TranscriptRecord")]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

/// Serialized shape of a [`Transcript`], checked before it becomes one.
#[derive(Deserialize)]
struct TranscriptRecord {
    messages: Vec<ChatMessage>,
}

impl TryFrom<TranscriptRecord> for Transcript {
    type Error = SousError;

    fn try_from(record: TranscriptRecord) -> Result<Self, Self::Error> {
        if record.messages.is_empty() {
            return Err(SousError::validation("transcript has no messages"));
        }
        Ok(Self {
            messages: record.messages,
        })
    }
}

impl Transcript {
    /// Creates a transcript whose first message is the assistant greeting.
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::assistant(greeting)],
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> &ChatMessage {
        // Seeded in `new`, never popped.
        &self.messages[self.messages.len() - 1]
    }

    /// Appends `delta` to the trailing assistant message and returns the
    /// cumulative text. Returns `None` if the last message is not from the
    /// assistant.
    pub fn append_to_last(&mut self, delta: &str) -> Option<&str> {
        let index = self.last_assistant_index()?;
        let message = &mut self.messages[index];
        message.text.push_str(delta);
        Some(message.text.as_str())
    }

    /// Replaces the text of the trailing assistant message.
    pub fn replace_last(&mut self, text: impl Into<String>) -> bool {
        match self.last_assistant_index() {
            Some(index) => {
                self.messages[index].text = text.into();
                true
            }
            None => false,
        }
    }

    fn last_assistant_index(&self) -> Option<usize> {
        let index = self.messages.len() - 1;
        (self.messages[index].role == ChatRole::Assistant).then_some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_transcript_is_seeded() {
        let transcript = Transcript::new("Hello!");
        assert_eq!(transcript.messages().len(), 1);
        assert_eq!(transcript.last().role, ChatRole::Assistant);
        assert_eq!(transcript.last().text, "Hello!");
    }

    #[test]
    fn test_append_to_last_accumulates() {
        let mut transcript = Transcript::new("Hi");
        transcript.push(ChatMessage::user("How long do I boil an egg?"));
        transcript.push(ChatMessage::assistant(""));

        assert_eq!(transcript.append_to_last("About "), Some("About "));
        assert_eq!(transcript.append_to_last("7 minutes."), Some("About 7 minutes."));
        assert_eq!(transcript.messages().len(), 3);
    }

    #[test]
    fn test_user_message_is_never_mutated() {
        let mut transcript = Transcript::new("Hi");
        transcript.push(ChatMessage::user("question"));

        assert_eq!(transcript.append_to_last("x"), None);
        assert!(!transcript.replace_last("y"));
        assert_eq!(transcript.last().text, "question");
    }

    #[test]
    fn test_deserialize_rejects_empty_transcript() {
        let err = serde_json::from_str::<Transcript>(r#"{"messages":[]}"#).unwrap_err();
        assert!(err.to_string().contains("transcript has no messages"));
    }

    #[test]
    fn test_deserialize_keeps_messages() {
        let original = Transcript::new("Hi");
        let json = serde_json::to_string(&original).unwrap();

        let restored: Transcript = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, original);
        assert_eq!(restored.last().text, "Hi");
    }

    #[test]
    fn test_replace_last() {
        let mut transcript = Transcript::new("Hi");
        transcript.push(ChatMessage::user("question"));
        transcript.push(ChatMessage::assistant("garbled par"));

        assert!(transcript.replace_last("fallback"));
        assert_eq!(transcript.last().text, "fallback");
        assert_eq!(transcript.messages()[1].text, "question");
    }
}
