use anyhow::Result;

use crate::storage::{ConfigStore, PROTOCOL_KEY};

pub const PERSONA: &str = "You are a friendly and patient math tutor.";
pub const CLOSING: &str = "Be friendly, patient, encouraging. Build confidence and understanding!";

pub const TECHNICAL_STYLE: &str = include_str!("../content/technical_style.md");
pub const BACKGROUND_KNOWLEDGE: &str = include_str!("../content/background_knowledge.md");
pub const DEFAULT_PROTOCOL: &str = include_str!("../content/default_protocol.md");
pub const TECHNICAL_FORMATTING: &str = include_str!("../content/technical_formatting.md");

/// Assembles the system prompt around a pedagogical protocol. The protocol is
/// the only user-editable section.
pub fn build_system_prompt(protocol: &str) -> String {
    format!(
        "{PERSONA}\n\n{style}\n\n---\n\n## Background Knowledge Reference\nYou have access to comprehensive background knowledge covering chapters A through N:\n{knowledge}\n\n---\n\n{protocol}\n\n---\n\n{formatting}\n\n{CLOSING}",
        style = TECHNICAL_STYLE.trim_end(),
        knowledge = BACKGROUND_KNOWLEDGE.trim_end(),
        protocol = protocol.trim_end(),
        formatting = TECHNICAL_FORMATTING.trim_end(),
    )
}

/// Reads the protocol override from the store at build time.
pub struct PromptBuilder<'a> {
    store: &'a dyn ConfigStore,
}

impl<'a> PromptBuilder<'a> {
    pub fn new(store: &'a dyn ConfigStore) -> Self {
        Self { store }
    }

    /// Stored override, or the built-in default when absent or blank.
    pub fn protocol(&self) -> String {
        match self.store.get(PROTOCOL_KEY) {
            Some(custom) if !custom.trim().is_empty() => custom,
            _ => DEFAULT_PROTOCOL.to_string(),
        }
    }

    pub fn is_customized(&self) -> bool {
        self.store
            .get(PROTOCOL_KEY)
            .is_some_and(|custom| !custom.trim().is_empty())
    }

    /// An explicit non-blank `override_protocol` wins over the store.
    pub fn build(&self, override_protocol: Option<&str>) -> String {
        match override_protocol {
            Some(protocol) if !protocol.trim().is_empty() => build_system_prompt(protocol),
            _ => build_system_prompt(&self.protocol()),
        }
    }

    pub fn set_protocol(&self, protocol: &str) -> Result<()> {
        self.store.set(PROTOCOL_KEY, protocol)
    }

    pub fn reset_protocol(&self) -> Result<()> {
        self.store.remove(PROTOCOL_KEY)
    }
}
