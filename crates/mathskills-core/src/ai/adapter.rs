use futures_util::future::{AbortRegistration, Abortable};
use std::sync::Arc;
use tracing::{debug, info};

use super::{AdapterError, ChatModel, WireMessage};
use crate::prompt::PromptBuilder;
use crate::state::{ChatMessage, ChatRole};
use crate::storage::ConfigStore;

/// Turns the chat thread into one completion request and the reply back
/// into an assistant message.
#[derive(Clone)]
pub struct ConversationAdapter {
    client: Arc<dyn ChatModel>,
    store: Arc<dyn ConfigStore>,
    model: String,
}

impl ConversationAdapter {
    pub fn new(client: Arc<dyn ChatModel>, store: Arc<dyn ConfigStore>, model: &str) -> Self {
        Self {
            client,
            store,
            model: model.to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn set_model(&mut self, model: &str) {
        self.model = model.to_string();
    }

    /// Wire messages for `messages`: any system messages are dropped and a
    /// freshly built system prompt leads.
    pub fn wire_messages(&self, messages: &[ChatMessage]) -> Vec<WireMessage> {
        let system_prompt = PromptBuilder::new(self.store.as_ref()).build(None);

        std::iter::once(WireMessage::new(ChatRole::System.as_str(), system_prompt))
            .chain(
                messages
                    .iter()
                    .filter(|m| m.role != ChatRole::System)
                    .map(|m| WireMessage::new(m.role.as_str(), m.text())),
            )
            .collect()
    }

    pub async fn send(&self, messages: &[ChatMessage]) -> Result<ChatMessage, AdapterError> {
        let wire = self.wire_messages(messages);
        debug!(
            provider = self.client.name(),
            model = %self.model,
            turns = wire.len() - 1,
            "Dispatching conversation"
        );

        let reply = self.client.complete(&self.model, &wire).await?;
        Ok(ChatMessage::assistant(reply))
    }

    /// Like [`send`](Self::send), but resolves to [`AdapterError::Aborted`]
    /// as soon as the paired handle is aborted.
    pub async fn send_abortable(
        &self,
        messages: &[ChatMessage],
        registration: AbortRegistration,
    ) -> Result<ChatMessage, AdapterError> {
        match Abortable::new(self.send(messages), registration).await {
            Ok(result) => result,
            Err(_) => {
                info!("Conversation request aborted");
                Err(AdapterError::Aborted)
            }
        }
    }
}
