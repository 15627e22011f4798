use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::storage::{ConfigStore, SUGGESTIONS_KEY};

/// A conversation starter shown when the thread is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub title: String,
    pub label: String,
    /// Text sent as the user's first message when picked
    pub action: String,
}

/// The editable part of a suggestion, as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSuggestion {
    pub title: String,
    pub action: String,
}

const DEFAULTS: [(&str, &str, &str); 4] = [
    ("Start the diagnostic quiz", "to assess my math skills", "I'm ready to start!"),
    ("Help me with algebra", "simplification and equations", "Can you help me with algebra?"),
    ("Explain Pythagoras", "theorem with examples", "Explain Pythagoras' theorem"),
    ("Practice rounding", "to significant figures", "I want to practice rounding"),
];

pub fn default_suggestions() -> Vec<Suggestion> {
    DEFAULTS
        .iter()
        .map(|(title, label, action)| Suggestion {
            title: title.to_string(),
            label: label.to_string(),
            action: action.to_string(),
        })
        .collect()
}

/// Stored override if present and parsable, built-in defaults otherwise.
pub fn load_suggestions(store: &dyn ConfigStore) -> Vec<Suggestion> {
    let Some(raw) = store.get(SUGGESTIONS_KEY) else {
        return default_suggestions();
    };

    match serde_json::from_str::<Vec<StoredSuggestion>>(&raw) {
        Ok(custom) => custom
            .into_iter()
            .map(|s| Suggestion {
                label: s.title.to_lowercase(),
                title: s.title,
                action: s.action,
            })
            .collect(),
        Err(e) => {
            warn!("Ignoring unreadable suggestion override: {}", e);
            default_suggestions()
        }
    }
}

pub fn save_suggestions(store: &dyn ConfigStore, suggestions: &[StoredSuggestion]) -> Result<()> {
    store.set(SUGGESTIONS_KEY, &serde_json::to_string(suggestions)?)
}

pub fn reset_suggestions(store: &dyn ConfigStore) -> Result<()> {
    store.remove(SUGGESTIONS_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_defaults_when_absent() {
        let store = MemoryStore::new();
        let suggestions = load_suggestions(&store);

        assert_eq!(suggestions.len(), 4);
        assert_eq!(suggestions[0].action, "I'm ready to start!");
    }

    #[test]
    fn test_override_derives_label() {
        let store = MemoryStore::new();
        save_suggestions(
            &store,
            &[StoredSuggestion {
                title: "Quadratics Drill".to_string(),
                action: "Give me a quadratic to factorise".to_string(),
            }],
        )
        .unwrap();

        let suggestions = load_suggestions(&store);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].label, "quadratics drill");
        assert_eq!(suggestions[0].action, "Give me a quadratic to factorise");
    }

    #[test]
    fn test_garbage_override_falls_back() {
        let store = MemoryStore::new();
        store.set(SUGGESTIONS_KEY, "[{\"title\": 3}]").unwrap();

        assert_eq!(load_suggestions(&store), default_suggestions());

        reset_suggestions(&store).unwrap();
        assert_eq!(store.get(SUGGESTIONS_KEY), None);
    }
}
