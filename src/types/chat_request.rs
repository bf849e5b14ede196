use serde::{Deserialize, Serialize};

/// Body sent to `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    /// The user's question.
    pub query: String,
}

impl ChatRequest {
    /// Creates a new ChatRequest.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}
