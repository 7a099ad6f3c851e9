//! Core data models for the query router

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

//
// ================= Enums =================
//

/// Outcome of keyword classification. Decides which agent answers a query.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Financial,
    General,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Financial, Category::General];
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

//
// ================= Agent Responses =================
//

/// One turn inside a message-list response. Either field may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AgentMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl AgentMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Some(role.into()),
            content: Some(content.into()),
        }
    }
}

/// Every shape an agent may answer with
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawResponse {
    PlainText { text: String },
    StructuredContent { content: String },
    MessageList { messages: Vec<AgentMessage> },
    Opaque { value: serde_json::Value },
}

impl RawResponse {
    pub fn plain(text: impl Into<String>) -> Self {
        RawResponse::PlainText { text: text.into() }
    }

    pub fn structured(content: impl Into<String>) -> Self {
        RawResponse::StructuredContent {
            content: content.into(),
        }
    }

    pub fn messages(messages: Vec<AgentMessage>) -> Self {
        RawResponse::MessageList { messages }
    }

    pub fn opaque(value: serde_json::Value) -> Self {
        RawResponse::Opaque { value }
    }
}

impl fmt::Display for AgentMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => write!(f, "{:?}", self),
        }
    }
}

impl fmt::Display for RawResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawResponse::PlainText { text } => f.write_str(text),
            RawResponse::StructuredContent { content } => f.write_str(content),
            RawResponse::MessageList { messages } => match serde_json::to_string(messages) {
                Ok(json) => f.write_str(&json),
                Err(_) => write!(f, "{:?}", messages),
            },
            RawResponse::Opaque { value } => match value {
                serde_json::Value::String(s) => f.write_str(s),
                other => write!(f, "{}", other),
            },
        }
    }
}

//
// ================= Conversation =================
//

/// A role-tagged plain-text entry of a conversation history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedMessage {
    pub role: Role,
    pub content: String,
    /// Position of this message in its history
    pub index: usize,
    pub timestamp: DateTime<Utc>,
}

impl NormalizedMessage {
    pub fn new(role: Role, content: impl Into<String>, index: usize) -> Self {
        Self {
            role,
            content: content.into(),
            index,
            timestamp: Utc::now(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Financial => "financial",
            Category::General => "general",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        };
        write!(f, "{}", s)
    }
}
