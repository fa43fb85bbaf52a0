//! Conversation session registry
//!
//! In-memory store of dialogue contexts. Each conversation carries its own
//! async mutex so turns are processed strictly one at a time per
//! conversation, while different conversations proceed independently.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::dialogue::DialogueContext;

/// One registered conversation: its context behind a turn-serializing lock.
pub type SessionHandle = Arc<Mutex<DialogueContext>>;

/// Registry of active conversations.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new conversation and return its id.
    pub fn create(&self, user_id: &str) -> Uuid {
        let conversation_id = Uuid::new_v4();
        let context = DialogueContext::new(conversation_id, user_id);

        self.sessions
            .write()
            .insert(conversation_id, Arc::new(Mutex::new(context)));

        tracing::info!(conversation_id = %conversation_id, "Conversation opened");
        conversation_id
    }

    /// Fetch a conversation's handle. The caller locks it for the duration
    /// of one turn.
    pub fn get(&self, conversation_id: Uuid) -> Option<SessionHandle> {
        self.sessions.read().get(&conversation_id).cloned()
    }

    /// Tear down a conversation (explicit history clear).
    pub fn remove(&self, conversation_id: Uuid) -> bool {
        let removed = self.sessions.write().remove(&conversation_id).is_some();
        if removed {
            tracing::info!(conversation_id = %conversation_id, "Conversation cleared");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}
