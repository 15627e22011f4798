use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::state::ChatMessage;
use crate::storage::{ConfigStore, CONVERSATION_KEY};

#[derive(Serialize, Deserialize, Default)]
struct StoredConversation {
    #[serde(default)]
    messages: Vec<ChatMessage>,
}

/// Conversation persistence on top of the key/value store.
#[derive(Clone)]
pub struct ConversationHistory {
    store: Arc<dyn ConfigStore>,
}

impl ConversationHistory {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store }
    }

    /// Stored messages, or an empty list when nothing usable is stored.
    pub fn load(&self) -> Vec<ChatMessage> {
        let Some(raw) = self.store.get(CONVERSATION_KEY) else {
            return Vec::new();
        };

        match serde_json::from_str::<StoredConversation>(&raw) {
            Ok(stored) => stored.messages,
            Err(e) => {
                warn!("Failed to load conversation: {}", e);
                Vec::new()
            }
        }
    }

    pub fn append(&self, message: &ChatMessage) -> Result<()> {
        let mut messages = self.load();
        messages.push(message.clone());
        self.save(&messages)
    }

    pub fn save(&self, messages: &[ChatMessage]) -> Result<()> {
        let stored = StoredConversation {
            messages: messages.to_vec(),
        };
        self.store
            .set(CONVERSATION_KEY, &serde_json::to_string(&stored)?)
    }

    /// Starts a new conversation.
    pub fn clear(&self) -> Result<()> {
        self.store.remove(CONVERSATION_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore};

    #[test]
    fn test_empty_store_loads_nothing() {
        let history = ConversationHistory::new(Arc::new(MemoryStore::new()));
        assert!(history.load().is_empty());
    }

    #[test]
    fn test_append_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileStore::open(&dir.path().join("storage.json")).unwrap());
        let history = ConversationHistory::new(store);

        let question = ChatMessage::user("Explain Pythagoras' theorem");
        let answer = ChatMessage::assistant("$$a^2+b^2=c^2$$");
        history.append(&question).unwrap();
        history.append(&answer).unwrap();

        let loaded = history.load();
        assert_eq!(loaded, vec![question, answer]);

        history.clear().unwrap();
        assert!(history.load().is_empty());
    }

    #[test]
    fn test_corrupt_blob_loads_nothing() {
        let store = Arc::new(MemoryStore::new());
        store.set(CONVERSATION_KEY, "{\"messages\": 42}").unwrap();

        let history = ConversationHistory::new(store);
        assert!(history.load().is_empty());
    }
}
