pub mod ai;
pub mod animation;
pub mod config;
pub mod history;
pub mod markdown;
pub mod model;
pub mod progress;
pub mod prompt;
pub mod state;
pub mod storage;
pub mod suggestions;
pub mod templates;

// Re-export main types for convenience
pub use ai::{AdapterError, ChatModel, ConversationAdapter, PollinationsClient};
pub use animation::{AnimationTrigger, CelebrationKind, MountLedger};
pub use config::Config;
pub use history::ConversationHistory;
pub use markdown::MarkdownPipeline;
pub use model::TextModel;
pub use progress::{extract_progress, ProgressRecord, ProgressTracker};
pub use prompt::{build_system_prompt, PromptBuilder};
pub use state::{ChatMessage, ChatRole, ContentPart};
pub use storage::{ConfigStore, FileStore, MemoryStore, Theme};
pub use suggestions::{load_suggestions, Suggestion};
pub use templates::{get_template, GeoGebraTemplate};
