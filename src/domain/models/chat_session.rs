use uuid::Uuid;

use super::{ChatModel, Conversation};

/// Everything one browser (or terminal) session owns: its transcript plus
/// the title and model currently selected in the UI.
#[derive(Debug, Clone)]
pub struct ChatSession {
    id: String,
    title: String,
    model: ChatModel,
    conversation: Conversation,
    created_at: i64,
}

impl ChatSession {
    pub fn new(title: impl Into<String>, model: ChatModel) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            model,
            conversation: Conversation::new(),
            created_at: current_timestamp(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Blank titles are ignored so the page never loses its heading.
    pub fn set_title(&mut self, title: &str) {
        let title = title.trim();
        if !title.is_empty() {
            self.title = title.to_string();
        }
    }

    pub fn model(&self) -> ChatModel {
        self.model
    }

    pub fn select_model(&mut self, model: ChatModel) {
        self.model = model;
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn conversation_mut(&mut self) -> &mut Conversation {
        &mut self.conversation
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }
}

fn current_timestamp() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
