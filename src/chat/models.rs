//! Data model for a persisted conversation: two roles, flat string
//! content, and an append-only transcript.
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: &str) -> Self {
        ChatMessage {
            role,
            content: content.to_string(),
        }
    }
}

/// Messages in the order they were said, oldest first.
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct Transcript(Vec<ChatMessage>);

impl Transcript {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn new_with_messages(messages: Vec<ChatMessage>) -> Self {
        Self(messages)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.0
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.0.push(message);
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.0.last()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChatMessage> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        let serialized = serde_json::to_string(&Role::User).unwrap();
        assert_eq!(serialized, "\"user\"");

        let serialized = serde_json::to_string(&Role::Assistant).unwrap();
        assert_eq!(serialized, "\"assistant\"");
    }

    #[test]
    fn test_role_deserialization() {
        let deserialized: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(deserialized, Role::User);

        let deserialized: Role = serde_json::from_str("\"assistant\"").unwrap();
        assert_eq!(deserialized, Role::Assistant);
    }

    #[test]
    fn test_message_serialization() {
        let message = ChatMessage::new(Role::User, "Hola");
        let serialized = serde_json::to_string(&message).unwrap();
        assert_eq!(serialized, r#"{"role":"user","content":"Hola"}"#);
    }

    #[test]
    fn test_message_deserialization() {
        let message: ChatMessage =
            serde_json::from_str(r#"{"role":"assistant","content":"Hola, Fede"}"#).unwrap();
        assert_eq!(message, ChatMessage::new(Role::Assistant, "Hola, Fede"));
    }

    #[test]
    fn test_message_rejects_unknown_role() {
        let result: Result<ChatMessage, _> =
            serde_json::from_str(r#"{"role":"system","content":"nope"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_transcript_preserves_order() {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::new(Role::User, "first"));
        transcript.push(ChatMessage::new(Role::Assistant, "second"));
        transcript.push(ChatMessage::new(Role::User, "third"));

        let contents: Vec<&str> = transcript
            .iter()
            .map(|message| message.content.as_str())
            .collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
        assert_eq!(transcript.last().unwrap().content, "third");
    }
}
