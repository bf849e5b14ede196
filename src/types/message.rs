use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{ChatResponse, StructuredAnswer};

/// Role of the author of a message.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// User role.
    User,

    /// Assistant role.
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// One entry of the conversation history.
///
/// User messages only ever carry `content`.  Assistant messages are built from
/// a [`ChatResponse`] and keep whatever structured payload, citations and
/// confidence score the backend supplied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Who wrote the message.
    pub role: MessageRole,

    /// Display text, rendered verbatim.
    pub content: String,

    /// Optional summary and bullet points for enhanced rendering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured: Option<StructuredAnswer>,

    /// Source identifiers cited by the answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,

    /// Service-supplied reliability score, nominally in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Message {
    /// Create a user message with the given text.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            structured: None,
            sources: None,
            confidence: None,
        }
    }

    /// Create an assistant message holding only text.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            structured: None,
            sources: None,
            confidence: None,
        }
    }

    /// Returns true if the message was written by the user.
    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }

    /// Returns the bullets to render, if any.
    ///
    /// Empty for user messages regardless of what is attached.
    pub fn bullets(&self) -> &[String] {
        match (&self.role, &self.structured) {
            (MessageRole::Assistant, Some(structured)) => &structured.bullets,
            _ => &[],
        }
    }

    /// Returns the sources to cite, if any.
    ///
    /// Empty for user messages regardless of what is attached.
    pub fn citations(&self) -> &[String] {
        match (&self.role, &self.sources) {
            (MessageRole::Assistant, Some(sources)) => sources,
            _ => &[],
        }
    }
}

impl From<ChatResponse> for Message {
    fn from(response: ChatResponse) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: response.answer,
            structured: response.structured,
            sources: Some(response.sources),
            confidence: response.confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&MessageRole::Assistant).unwrap(),
            "\"assistant\""
        );
        assert_eq!(MessageRole::User.to_string(), "user");
    }

    #[test]
    fn assistant_from_response_keeps_everything() {
        let response = ChatResponse {
            answer: "Hi there".to_string(),
            structured: Some(StructuredAnswer::new("Hi", vec!["A".to_string()])),
            sources: vec!["faq.pdf".to_string()],
            confidence: Some(0.9),
        };
        let message = Message::from(response);
        assert_eq!(message.role, MessageRole::Assistant);
        assert_eq!(message.content, "Hi there");
        assert_eq!(message.bullets(), ["A".to_string()]);
        assert_eq!(message.citations(), ["faq.pdf".to_string()]);
        assert_eq!(message.confidence, Some(0.9));
    }

    #[test]
    fn user_messages_never_expose_decorations() {
        let mut message = Message::user("Hello");
        message.structured = Some(StructuredAnswer::new("", vec!["A".to_string()]));
        message.sources = Some(vec!["x".to_string()]);
        message.confidence = Some(0.5);
        assert!(message.bullets().is_empty());
        assert!(message.citations().is_empty());
    }

    #[test]
    fn user_message_serializes_without_optional_fields() {
        let json = serde_json::to_value(Message::user("Hello")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "content": "Hello"}));
    }
}
