//! Data models exchanged with the chat backend.

use serde::{Deserialize, Serialize};

/// Kind of a streamed event.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Incremental content fragment.
    Token,
    /// Terminal success marker.
    Complete,
    /// Terminal failure marker; `content` carries the server message.
    Error,
}

impl TokenKind {
    /// Whether an event of this kind ends the stream.
    pub fn is_terminal(self) -> bool {
        matches!(self, TokenKind::Complete | TokenKind::Error)
    }
}

/// One event of a streamed assistant reply.
///
/// Wire form: `{"type": "token", "content": "Hel", "message_id": "..."}`.
/// Payloads with a missing or unknown `type` do not decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreamToken {
    #[serde(rename = "type")]
    pub kind: TokenKind,

    #[serde(default)]
    pub content: String,

    /// Server-side message record this event belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

impl StreamToken {
    pub fn token(content: impl Into<String>) -> Self {
        Self {
            kind: TokenKind::Token,
            content: content.into(),
            message_id: None,
        }
    }

    pub fn complete(content: impl Into<String>) -> Self {
        Self {
            kind: TokenKind::Complete,
            content: content.into(),
            message_id: None,
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            kind: TokenKind::Error,
            content: content.into(),
            message_id: None,
        }
    }

    /// Attach the server-side message id.
    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    pub fn is_terminal(&self) -> bool {
        self.kind.is_terminal()
    }
}

/// Author of a stored message.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chat {
    pub id: String,
    pub title: String,
    pub created_at: String,
    pub updated_at: String,
    pub user_id: String,
}

/// A stored message within a chat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    pub chat_id: String,
    pub role: Role,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,

    /// Set while the assistant reply is still being generated
    #[serde(default)]
    pub is_streaming: bool,
}

/// A chat together with its message history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatWithMessages {
    #[serde(flatten)]
    pub chat: Chat,

    #[serde(default)]
    pub messages: Vec<Message>,
}

/// Health endpoint payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub version: String,
}

/// Body of the stream request.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct StreamRequest<'a> {
    pub content: &'a str,
}

/// Body of the chat creation request.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct CreateChatRequest<'a> {
    pub title: &'a str,
}
