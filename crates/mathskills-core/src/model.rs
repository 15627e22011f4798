/// Text models offered by the chat endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextModel {
    OpenAILarge,
    OpenAI,
    Mistral,
}

impl TextModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextModel::OpenAILarge => "openai-large",
            TextModel::OpenAI => "openai",
            TextModel::Mistral => "mistral",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "openai-large" => Some(TextModel::OpenAILarge),
            "openai" => Some(TextModel::OpenAI),
            "mistral" => Some(TextModel::Mistral),
            _ => None,
        }
    }

    pub fn all() -> Vec<TextModel> {
        vec![TextModel::OpenAILarge, TextModel::OpenAI, TextModel::Mistral]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TextModel::OpenAILarge => "OpenAI Large (default)",
            TextModel::OpenAI => "OpenAI",
            TextModel::Mistral => "Mistral",
        }
    }
}

impl Default for TextModel {
    fn default() -> Self {
        TextModel::OpenAILarge
    }
}
