//! Session layer
//!
//! A session owns exactly one conversation history. Sessions never share
//! state; the store hands out one lock per session so that concurrent
//! requests against the same session are applied one at a time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::error::RouterError;
use crate::memory::ConversationHistory;
use crate::Result;

/// One user session and its conversation log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub history: ConversationHistory,
}

impl Session {
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    pub fn with_id(id: Uuid) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            history: ConversationHistory::new(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

pub type SharedSession = Arc<Mutex<Session>>;

/// In-memory session registry for the API server
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SharedSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Start a fresh session
    pub async fn create(&self) -> (Uuid, SharedSession) {
        let session = Session::new();
        let id = session.id;
        let shared = Arc::new(Mutex::new(session));

        let mut sessions = self.sessions.write().await;
        sessions.insert(id, shared.clone());
        (id, shared)
    }

    pub async fn get(&self, id: Uuid) -> Result<SharedSession> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&id)
            .cloned()
            .ok_or(RouterError::SessionNotFound(id))
    }

    /// Look up `id`, creating the session under that id when it is unknown
    pub async fn get_or_create(&self, id: Option<Uuid>) -> (Uuid, SharedSession) {
        let Some(id) = id else {
            return self.create().await;
        };

        {
            let sessions = self.sessions.read().await;
            if let Some(session) = sessions.get(&id) {
                return (id, session.clone());
            }
        }

        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(Session::with_id(id))))
            .clone();
        (id, session)
    }

    /// End a session, dropping its history
    pub async fn end(&self, id: Uuid) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions
            .remove(&id)
            .map(|_| ())
            .ok_or(RouterError::SessionNotFound(id))
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
