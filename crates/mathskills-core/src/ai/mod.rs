pub mod adapter;
pub mod error;
pub mod pollinations;

pub use adapter::ConversationAdapter;
pub use error::AdapterError;
pub use pollinations::PollinationsClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One flattened message as sent over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: String,
    pub content: String,
}

impl WireMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// A remote chat completion endpoint.
#[async_trait]
pub trait ChatModel: Send + Sync {
    fn name(&self) -> &str;

    /// Sends the full message list and returns the assistant reply text.
    async fn complete(&self, model: &str, messages: &[WireMessage]) -> Result<String, AdapterError>;
}
