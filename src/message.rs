//! Chat Messages
//!
//! The conversation data model fed by the streaming pipeline. An assistant
//! message is created when the first delta of a response arrives, grows by
//! appending deltas, and becomes immutable once finalized.

use serde::{Deserialize, Serialize};

/// Message identifier, unique per message.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    /// Generate a new unique message ID.
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        Self(format!("msg_{id}"))
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

/// Who sent a message. Serialized lowercase to match the wire format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Student input
    User,
    /// Tutor response
    Assistant,
}

/// A single chat message.
///
/// User messages are complete from the start. Assistant messages start in
/// the streaming state with an empty buffer and accept deltas until
/// [`finalize`](Self::finalize) is called; after that the content is fixed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message ID
    pub id: MessageId,
    /// Who sent this message
    pub role: MessageRole,
    /// The message content (growing while streaming)
    content: String,
    /// Whether the content is still being streamed
    streaming: bool,
}

impl ChatMessage {
    /// Create a complete user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role: MessageRole::User,
            content: content.into(),
            streaming: false,
        }
    }

    /// Create an empty assistant message in the streaming state.
    #[must_use]
    pub fn assistant_streaming() -> Self {
        Self {
            id: MessageId::new(),
            role: MessageRole::Assistant,
            content: String::new(),
            streaming: true,
        }
    }

    /// The current content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Whether deltas are still being appended.
    #[must_use]
    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    /// Append a delta to a streaming message.
    ///
    /// Ignored (with a log) once the message is finalized; content is
    /// immutable from that point.
    pub fn append_delta(&mut self, delta: &str) {
        if !self.streaming {
            tracing::warn!(id = %self.id.0, "delta after finalization ignored");
            return;
        }
        self.content.push_str(delta);
    }

    /// Finalize the message, fixing its content.
    ///
    /// `final_content` replaces the accumulated buffer when provided (the
    /// backend may send a cleaned-up complete message); otherwise the
    /// concatenated deltas stand.
    pub fn finalize(&mut self, final_content: Option<String>) {
        if let Some(content) = final_content {
            self.content = content;
        }
        self.streaming = false;
    }
}
