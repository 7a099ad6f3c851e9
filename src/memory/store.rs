//! Conversation history storage
//!
//! Stores normalized messages in the order they were recorded

use crate::models::{NormalizedMessage, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Conversation history for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationHistory {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    messages: Vec<NormalizedMessage>,
}

impl ConversationHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self {
            created_at: Utc::now(),
            updated_at: Utc::now(),
            messages: Vec::new(),
        }
    }

    /// Append a message to the end of the log
    pub fn append(&mut self, message: NormalizedMessage) {
        self.messages.push(message);
        self.updated_at = Utc::now();
    }

    /// Append a User message followed by its Assistant reply.
    ///
    /// Both entries are stamped with their positions and land in a single
    /// call, so no reader observes an unanswered query.
    pub fn append_exchange(&mut self, query: impl Into<String>, reply: impl Into<String>) {
        let index = self.messages.len();
        self.messages.reserve(2);
        self.messages
            .push(NormalizedMessage::new(Role::User, query, index));
        self.messages
            .push(NormalizedMessage::new(Role::Assistant, reply, index + 1));
        self.updated_at = Utc::now();
    }

    /// Read-only view of all messages, oldest first
    pub fn all(&self) -> &[NormalizedMessage] {
        &self.messages
    }

    /// Most recent message, if any
    pub fn last(&self) -> Option<&NormalizedMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Render the conversation as markdown for replay
    pub fn transcript(&self) -> String {
        let mut out = String::new();
        out.push_str("## Conversation History\n\n");

        for msg in &self.messages {
            let role_str = match msg.role {
                Role::User => "**User**",
                Role::Assistant => "**Assistant**",
            };

            out.push_str(&format!(
                "{}: {} ({})\n\n",
                role_str,
                msg.content,
                msg.timestamp.format("%H:%M:%S")
            ));
        }

        out
    }

    /// Clear history
    pub fn clear(&mut self) {
        self.messages.clear();
        self.updated_at = Utc::now();
    }
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new()
    }
}
